//! DOCX styles parsing and `basedOn` chain resolution.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::properties::{Indent, IndentField};
use super::xml::{self, local_name, Ns, PartReader, XmlEvent};
use quick_xml::events::BytesStart;

/// Style type (paragraph, character, table, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(StyleType::Paragraph),
            "character" => Some(StyleType::Character),
            "table" => Some(StyleType::Table),
            "numbering" => Some(StyleType::Numbering),
            _ => None,
        }
    }
}

/// A parsed style definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDefinition {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Style name (e.g., "heading 1")
    pub name: String,
    /// Style type
    pub style_type: Option<StyleType>,
    /// Parent style (`w:basedOn`)
    pub parent_id: Option<String>,
    /// `w:pPr/w:ind`
    pub paragraph_indent: Option<Indent>,
    /// `w:pPr/w:outlineLvl` (zero-based)
    pub outline_level: Option<u8>,
}

/// Styles from styles.xml, keyed by style ID.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: HashMap<String, StyleDefinition>,
    /// Styles a cycle has already been reported for
    reported_cycles: RefCell<HashSet<String>>,
}

impl StyleCatalog {
    /// Parse styles from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut catalog = StyleCatalog::default();
        if xml.trim().is_empty() {
            return Ok(catalog);
        }

        let mut reader = PartReader::new(xml, "styles");
        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::Wml, e) if local_name(&e) == b"style" => {
                    let style = parse_style(&mut reader, &e)?;
                    catalog.insert(style);
                }
                XmlEvent::Empty(Ns::Wml, e) if local_name(&e) == b"style" => {
                    catalog.insert(style_header(&e));
                }
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(catalog)
    }

    fn insert(&mut self, style: StyleDefinition) {
        if style.id.is_empty() {
            return;
        }
        if self.styles.contains_key(&style.id) {
            log::debug!("duplicate style id '{}', keeping the first", style.id);
            return;
        }
        self.styles.insert(style.id.clone(), style);
    }

    /// Get a style by ID, without inheritance.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the catalog has no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Walk the `basedOn` chain from `style_id`, returning the first value
    /// `select` yields.
    ///
    /// Returns `Ok(None)` when no style in the chain defines the value, or
    /// the chain reaches an unknown style ID. Revisiting a style is an
    /// [`Error::StyleCycle`].
    pub fn try_resolve_effective<T>(
        &self,
        style_id: &str,
        select: impl Fn(&StyleDefinition) -> Option<T>,
    ) -> Result<Option<T>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(style_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(Error::StyleCycle(id.to_string()));
            }
            let Some(style) = self.styles.get(id) else {
                log::debug!("style '{}' is not defined", id);
                return Ok(None);
            };
            if let Some(value) = select(style) {
                return Ok(Some(value));
            }
            current = style.parent_id.as_deref();
        }

        Ok(None)
    }

    /// Like [`try_resolve_effective`](Self::try_resolve_effective), but a
    /// cycle resolves to `None` and is logged as a warning once per style.
    pub fn resolve_effective<T>(
        &self,
        style_id: &str,
        select: impl Fn(&StyleDefinition) -> Option<T>,
    ) -> Option<T> {
        match self.try_resolve_effective(style_id, select) {
            Ok(value) => value,
            Err(Error::StyleCycle(at)) => {
                if self.reported_cycles.borrow_mut().insert(style_id.to_string()) {
                    log::warn!(
                        "basedOn cycle while resolving style '{}' (revisits '{}')",
                        style_id,
                        at
                    );
                }
                None
            }
            Err(e) => {
                log::warn!("failed to resolve style '{}': {}", style_id, e);
                None
            }
        }
    }

    /// Effective value of one indent field.
    pub fn effective_indent(&self, style_id: &str, field: IndentField) -> Option<String> {
        self.resolve_effective(style_id, |s| {
            s.paragraph_indent
                .as_ref()
                .and_then(|ind| field.get(ind))
                .map(str::to_string)
        })
    }

    /// Effective outline level (zero-based).
    pub fn effective_outline_level(&self, style_id: &str) -> Option<u8> {
        self.resolve_effective(style_id, |s| s.outline_level)
    }

    /// Style IDs whose resolution ran into a `basedOn` cycle so far, sorted.
    pub fn reported_cycles(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.reported_cycles.borrow().iter().cloned().collect();
        ids.sort();
        ids
    }
}

/// Attributes of a `<w:style>` start tag.
fn style_header(e: &BytesStart<'_>) -> StyleDefinition {
    StyleDefinition {
        id: xml::attr(e, b"styleId").unwrap_or_default(),
        style_type: xml::attr(e, b"type").and_then(|t| StyleType::from_attr(&t)),
        ..Default::default()
    }
}

/// Parse one `<w:style>` element whose start tag was just read.
fn parse_style(reader: &mut PartReader<'_>, start: &BytesStart<'_>) -> Result<StyleDefinition> {
    let mut style = style_header(start);
    // open elements below <w:style>
    let mut depth = 0usize;
    let mut in_ppr = false;

    loop {
        match reader.next()? {
            XmlEvent::Start(ns, e) => {
                if ns == Ns::Wml {
                    apply_style_child(&mut style, &e, depth, in_ppr);
                    if depth == 0 && local_name(&e) == b"pPr" {
                        in_ppr = true;
                    }
                }
                depth += 1;
            }
            XmlEvent::Empty(Ns::Wml, e) => apply_style_child(&mut style, &e, depth, in_ppr),
            XmlEvent::End => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    in_ppr = false;
                }
            }
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    Ok(style)
}

fn apply_style_child(style: &mut StyleDefinition, e: &BytesStart<'_>, depth: usize, in_ppr: bool) {
    match (depth, local_name(e)) {
        (0, b"name") => style.name = xml::val(e).unwrap_or_default(),
        (0, b"basedOn") => style.parent_id = xml::val(e).filter(|v| !v.is_empty()),
        // only direct pPr children; pPrChange holds superseded values
        (1, b"ind") if in_ppr => style.paragraph_indent = Some(Indent::from_element(e)),
        (1, b"outlineLvl") if in_ppr => style.outline_level = xml::numeric_val(e),
        _ => {}
    }
}

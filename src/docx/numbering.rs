//! DOCX numbering (list) parsing.

use crate::error::Result;
use quick_xml::events::BytesStart;
use std::collections::{BTreeMap, HashMap};

use super::properties::Indent;
use super::xml::{self, local_name, Ns, PartReader, XmlEvent};

/// A numbering level definition.
///
/// The same shape carries instance overrides, where every unset field
/// falls through to the abstract definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingLevel {
    /// Level index (0-8)
    pub ilvl: u8,
    /// Number format (decimal, bullet, decimalFullWidth, ...)
    pub num_format: Option<String>,
    /// Level text template (e.g., "%1.", "%1.%2.")
    pub level_text: Option<String>,
    /// Start value
    pub start: Option<u32>,
    /// `w:pPr/w:ind` of the level
    pub indent: Option<Indent>,
}

impl NumberingLevel {
    /// Overlay an override on this level, field by field.
    pub fn merge(&mut self, other: &NumberingLevel) {
        if other.num_format.is_some() {
            self.num_format = other.num_format.clone();
        }
        if other.level_text.is_some() {
            self.level_text = other.level_text.clone();
        }
        if other.start.is_some() {
            self.start = other.start;
        }
        match (&mut self.indent, &other.indent) {
            (Some(base), Some(over)) => base.merge(over),
            (None, Some(over)) => self.indent = Some(over.clone()),
            _ => {}
        }
    }
}

/// Abstract numbering definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractNumbering {
    /// Abstract numbering ID
    pub abstract_id: String,
    /// Levels, ordered by `ilvl`
    pub levels: Vec<NumberingLevel>,
}

impl AbstractNumbering {
    /// Level with the given index.
    pub fn level(&self, ilvl: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }
}

/// Concrete numbering instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingInstance {
    /// Numbering ID
    pub num_id: String,
    /// Abstract numbering ID
    pub abstract_id: String,
    /// Per-level overrides (`w:lvlOverride`)
    pub level_overrides: BTreeMap<u8, NumberingLevel>,
}

/// Numbering definitions from numbering.xml.
#[derive(Debug, Clone, Default)]
pub struct NumberingCatalog {
    /// Abstract numbering definitions
    pub abstract_numberings: HashMap<String, AbstractNumbering>,
    /// Numbering instances
    pub instances: HashMap<String, NumberingInstance>,
}

impl NumberingCatalog {
    /// Parse numbering from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut catalog = NumberingCatalog::default();
        if xml.trim().is_empty() {
            return Ok(catalog);
        }

        let mut reader = PartReader::new(xml, "numbering");
        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::Wml, e) => match local_name(&e) {
                    b"abstractNum" => {
                        let abstract_num = parse_abstract(&mut reader, &e)?;
                        catalog
                            .abstract_numberings
                            .entry(abstract_num.abstract_id.clone())
                            .or_insert(abstract_num);
                    }
                    b"num" => {
                        let instance = parse_instance(&mut reader, &e)?;
                        if instance.num_id.is_empty() || instance.abstract_id.is_empty() {
                            log::debug!("skipping incomplete w:num '{}'", instance.num_id);
                        } else {
                            catalog
                                .instances
                                .entry(instance.num_id.clone())
                                .or_insert(instance);
                        }
                    }
                    _ => {}
                },
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(catalog)
    }

    /// Resolve a level of a numbering instance.
    ///
    /// Follows the instance to its abstract definition and merges the
    /// instance's override for `ilvl` on top. `None` means no numbering
    /// metadata is available; it is never an error.
    pub fn resolve_level(&self, num_id: &str, ilvl: u8) -> Option<NumberingLevel> {
        let instance = self.instances.get(num_id)?;
        let base = match self.abstract_numberings.get(&instance.abstract_id) {
            Some(abstract_num) => abstract_num.level(ilvl),
            None => {
                log::debug!(
                    "numbering instance '{}' references unknown abstractNum '{}'",
                    num_id,
                    instance.abstract_id
                );
                None
            }
        };

        match (base, instance.level_overrides.get(&ilvl)) {
            (Some(base), Some(over)) => {
                let mut level = base.clone();
                level.merge(over);
                Some(level)
            }
            (Some(base), None) => Some(base.clone()),
            (None, Some(over)) => Some(over.clone()),
            (None, None) => None,
        }
    }

    /// Check if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.abstract_numberings.is_empty() && self.instances.is_empty()
    }
}

/// Parse a `<w:abstractNum>` whose start tag was just read.
fn parse_abstract(reader: &mut PartReader<'_>, start: &BytesStart<'_>) -> Result<AbstractNumbering> {
    let mut abstract_num = AbstractNumbering {
        abstract_id: xml::attr(start, b"abstractNumId").unwrap_or_default(),
        levels: Vec::new(),
    };
    let mut depth = 0usize;

    loop {
        match reader.next()? {
            XmlEvent::Start(Ns::Wml, e) if depth == 0 && local_name(&e) == b"lvl" => {
                let level = parse_level(reader, &e)?;
                if abstract_num.level(level.ilvl).is_none() {
                    abstract_num.levels.push(level);
                }
            }
            XmlEvent::Start(..) => depth += 1,
            XmlEvent::End => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    abstract_num.levels.sort_by_key(|l| l.ilvl);
    Ok(abstract_num)
}

/// Parse a `<w:num>` whose start tag was just read.
fn parse_instance(reader: &mut PartReader<'_>, start: &BytesStart<'_>) -> Result<NumberingInstance> {
    let mut instance = NumberingInstance {
        num_id: xml::attr(start, b"numId").unwrap_or_default(),
        ..Default::default()
    };
    let mut depth = 0usize;

    loop {
        match reader.next()? {
            XmlEvent::Start(Ns::Wml, e) if depth == 0 && local_name(&e) == b"lvlOverride" => {
                let level = parse_override(reader, &e)?;
                instance.level_overrides.entry(level.ilvl).or_insert(level);
            }
            XmlEvent::Empty(Ns::Wml, e) if depth == 0 && local_name(&e) == b"abstractNumId" => {
                instance.abstract_id = xml::val(&e).unwrap_or_default();
            }
            XmlEvent::Start(Ns::Wml, e) if depth == 0 && local_name(&e) == b"abstractNumId" => {
                instance.abstract_id = xml::val(&e).unwrap_or_default();
                depth += 1;
            }
            XmlEvent::Start(..) => depth += 1,
            XmlEvent::End => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    Ok(instance)
}

/// Parse a `<w:lvlOverride>` whose start tag was just read.
///
/// The result carries only what the override states: a nested `<w:lvl>`
/// and/or `<w:startOverride>`, the latter taking precedence for `start`.
fn parse_override(reader: &mut PartReader<'_>, start: &BytesStart<'_>) -> Result<NumberingLevel> {
    let ilvl = xml::attr(start, b"ilvl")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    let mut level = NumberingLevel {
        ilvl,
        ..Default::default()
    };
    let mut start_override: Option<u32> = None;
    let mut depth = 0usize;

    loop {
        match reader.next()? {
            XmlEvent::Start(Ns::Wml, e) if depth == 0 && local_name(&e) == b"lvl" => {
                level = parse_level(reader, &e)?;
                level.ilvl = ilvl;
            }
            XmlEvent::Empty(Ns::Wml, e) if depth == 0 && local_name(&e) == b"startOverride" => {
                start_override = xml::numeric_val(&e);
            }
            XmlEvent::Start(..) => depth += 1,
            XmlEvent::End => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    if start_override.is_some() {
        level.start = start_override;
    }
    Ok(level)
}

/// Where an element sits relative to `<w:lvl>`, seen through
/// `mc:AlternateContent` wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `mc:AlternateContent` / `mc:Fallback`: does not count as a level
    Transparent,
    ParagraphProps,
    Other,
}

/// Parse a `<w:lvl>` whose start tag was just read.
///
/// Inside `mc:AlternateContent` the `mc:Fallback` branch is read and
/// `mc:Choice` is skipped.
fn parse_level(reader: &mut PartReader<'_>, start: &BytesStart<'_>) -> Result<NumberingLevel> {
    let mut level = NumberingLevel {
        ilvl: xml::attr(start, b"ilvl")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        ..Default::default()
    };
    let mut open: Vec<Frame> = Vec::new();

    loop {
        match reader.next()? {
            XmlEvent::Start(Ns::MarkupCompat, e) => {
                if local_name(&e) == b"Choice" {
                    reader.skip_element()?;
                } else {
                    open.push(Frame::Transparent);
                }
            }
            XmlEvent::Start(ns, e) => {
                let (depth, parent) = position(&open);
                if ns == Ns::Wml {
                    apply_level_child(&mut level, &e, depth, parent);
                }
                let frame = if ns == Ns::Wml && depth == 0 && local_name(&e) == b"pPr" {
                    Frame::ParagraphProps
                } else {
                    Frame::Other
                };
                open.push(frame);
            }
            XmlEvent::Empty(Ns::Wml, e) => {
                let (depth, parent) = position(&open);
                apply_level_child(&mut level, &e, depth, parent);
            }
            XmlEvent::End => {
                if open.pop().is_none() {
                    break;
                }
            }
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    Ok(level)
}

/// Logical depth below `<w:lvl>` and the nearest counted parent.
fn position(open: &[Frame]) -> (usize, Option<Frame>) {
    let depth = open.iter().filter(|f| **f != Frame::Transparent).count();
    let parent = open.iter().rev().find(|f| **f != Frame::Transparent).copied();
    (depth, parent)
}

fn apply_level_child(level: &mut NumberingLevel, e: &BytesStart<'_>, depth: usize, parent: Option<Frame>) {
    match (depth, local_name(e)) {
        (0, b"start") => level.start = xml::numeric_val(e),
        (0, b"numFmt") => level.num_format = xml::val(e),
        (0, b"lvlText") => level.level_text = xml::val(e),
        (1, b"ind") if parent == Some(Frame::ParagraphProps) => {
            level.indent = Some(Indent::from_element(e));
        }
        _ => {}
    }
}

//! Document tree builder for `word/document.xml`.

use crate::error::Result;
use crate::model::{attrs, BlockNode, BlockType, DocumentTree};
use quick_xml::events::BytesStart;

use super::options::{BodyElements, ReaderOptions};
use super::properties::{Indent, NumberingReference, ParagraphProperties};
use super::resolve::ParagraphFormatter;
use super::xml::{self, local_name, Ns, PartReader, XmlEvent};

/// Builds the flat block list from a main document part.
pub(crate) struct TreeBuilder<'a> {
    formatter: ParagraphFormatter<'a>,
    options: &'a ReaderOptions,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(formatter: ParagraphFormatter<'a>, options: &'a ReaderOptions) -> Self {
        Self { formatter, options }
    }

    /// Walk the children of `<w:body>` in document order.
    pub(crate) fn build(&self, xml: &str, part: &str) -> Result<DocumentTree> {
        let mut tree = DocumentTree::new();
        let mut reader = PartReader::new(xml, part);

        // Find the body
        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::Wml, e) if local_name(&e) == b"body" => break,
                XmlEvent::Empty(Ns::Wml, e) if local_name(&e) == b"body" => {
                    finish(&mut reader)?;
                    return Ok(tree);
                }
                XmlEvent::Eof => {
                    log::debug!("{} has no body", part);
                    return Ok(tree);
                }
                _ => {}
            }
        }

        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::Wml, e) => match local_name(&e) {
                    b"p" => {
                        let (props, text) = self.read_paragraph(&mut reader)?;
                        tree.push(self.paragraph_node(&props, text));
                    }
                    b"sectPr" => reader.skip_element()?,
                    name => {
                        if self.options.body_elements == BodyElements::Passthrough {
                            let element = String::from_utf8_lossy(name).into_owned();
                            let text = self.read_text(&mut reader)?;
                            tree.push(passthrough_node(element, text));
                        } else {
                            reader.skip_element()?;
                        }
                    }
                },
                XmlEvent::Empty(Ns::Wml, e) => match local_name(&e) {
                    b"p" => {
                        tree.push(self.paragraph_node(&ParagraphProperties::default(), String::new()))
                    }
                    b"sectPr" => {}
                    name => {
                        if self.options.body_elements == BodyElements::Passthrough {
                            let element = String::from_utf8_lossy(name).into_owned();
                            tree.push(passthrough_node(element, String::new()));
                        }
                    }
                },
                // Foreign markup directly under the body
                XmlEvent::Start(..) => reader.skip_element()?,
                XmlEvent::End => break,
                XmlEvent::Eof => return Err(reader.unexpected_eof()),
                _ => {}
            }
        }

        finish(&mut reader)?;
        Ok(tree)
    }

    fn paragraph_node(&self, props: &ParagraphProperties, text: String) -> BlockNode {
        let resolved = self.formatter.resolve(props);
        let mut node = BlockNode {
            block_type: resolved.block_type,
            attrs: resolved.attrs,
            text,
        };
        if self.options.style_id_attr {
            if let Some(id) = &props.style_id {
                node.set_attr(attrs::STYLE_ID, id.as_str());
            }
        }
        node
    }

    /// Read a `<w:p>` whose start tag was just consumed.
    fn read_paragraph(&self, reader: &mut PartReader<'_>) -> Result<(ParagraphProperties, String)> {
        let mut props = ParagraphProperties::default();
        let mut text = String::new();
        // one entry per open element, true for `<w:r>`
        let mut open: Vec<bool> = Vec::new();
        let mut text_depth: Option<usize> = None;

        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::Wml, e) if open.is_empty() && local_name(&e) == b"pPr" => {
                    props = read_paragraph_properties(reader)?;
                }
                XmlEvent::Start(Ns::MarkupCompat, e) if local_name(&e) == b"Choice" => {
                    // the Fallback branch carries the same text
                    reader.skip_element()?;
                }
                XmlEvent::Start(ns, e) => {
                    let wml = ns == Ns::Wml;
                    if wml && local_name(&e) == b"t" {
                        text_depth = Some(open.len());
                    }
                    open.push(wml && local_name(&e) == b"r");
                }
                // Only run children are breaks; `w:tab` also appears under `w:tabs`
                XmlEvent::Empty(Ns::Wml, e)
                    if self.options.run_breaks && open.last() == Some(&true) =>
                {
                    if let Some(ch) = break_char(&e) {
                        text.push(ch);
                    }
                }
                XmlEvent::Text(t) if text_depth.is_some() => {
                    text.push_str(&reader.text(&t)?);
                }
                XmlEvent::End => {
                    if open.pop().is_none() {
                        break;
                    }
                    if text_depth == Some(open.len()) {
                        text_depth = None;
                    }
                }
                XmlEvent::Eof => return Err(reader.unexpected_eof()),
                _ => {}
            }
        }

        Ok((props, text))
    }

    /// Concatenated `<w:t>` text of an element whose start tag was just consumed.
    fn read_text(&self, reader: &mut PartReader<'_>) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut text_depth: Option<usize> = None;

        loop {
            match reader.next()? {
                XmlEvent::Start(Ns::MarkupCompat, e) if local_name(&e) == b"Choice" => {
                    reader.skip_element()?;
                }
                XmlEvent::Start(ns, e) => {
                    if ns == Ns::Wml && local_name(&e) == b"t" {
                        text_depth = Some(depth);
                    }
                    depth += 1;
                }
                XmlEvent::Text(t) if text_depth.is_some() => {
                    text.push_str(&reader.text(&t)?);
                }
                XmlEvent::End => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    if text_depth == Some(depth) {
                        text_depth = None;
                    }
                }
                XmlEvent::Eof => return Err(reader.unexpected_eof()),
                _ => {}
            }
        }

        Ok(text)
    }
}

/// Read the rest of the part after the body so a malformed tail is still an error.
fn finish(reader: &mut PartReader<'_>) -> Result<()> {
    while !matches!(reader.next()?, XmlEvent::Eof) {}
    Ok(())
}

fn passthrough_node(element: String, text: String) -> BlockNode {
    let mut node = BlockNode {
        block_type: BlockType::Passthrough,
        text,
        ..Default::default()
    };
    node.set_attr(attrs::ELEMENT, element);
    node
}

/// Character an in-run break element stands for.
fn break_char(e: &BytesStart<'_>) -> Option<char> {
    match local_name(e) {
        b"tab" => Some('\t'),
        b"br" | b"cr" => Some('\n'),
        _ => None,
    }
}

/// Read the direct children of a `<w:pPr>`.
///
/// Anything nested deeper, such as the old properties inside
/// `<w:pPrChange>`, is skipped.
fn read_paragraph_properties(reader: &mut PartReader<'_>) -> Result<ParagraphProperties> {
    let mut props = ParagraphProperties::default();

    loop {
        match reader.next()? {
            XmlEvent::Empty(Ns::Wml, e) => apply_property(&mut props, &e),
            XmlEvent::Start(Ns::Wml, e) if local_name(&e) == b"numPr" => {
                props.numbering = read_numbering_reference(reader)?;
            }
            XmlEvent::Start(ns, e) => {
                if ns == Ns::Wml {
                    apply_property(&mut props, &e);
                }
                reader.skip_element()?;
            }
            XmlEvent::End => break,
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    Ok(props)
}

fn apply_property(props: &mut ParagraphProperties, e: &BytesStart<'_>) {
    match local_name(e) {
        b"pStyle" => props.style_id = xml::val(e).filter(|id| !id.is_empty()),
        b"ind" => props.indent = Some(Indent::from_element(e)),
        b"outlineLvl" => props.outline_level = xml::numeric_val(e),
        _ => {}
    }
}

/// Read `<w:numPr>`; `numId="0"` and a missing `numId` mean no numbering.
fn read_numbering_reference(reader: &mut PartReader<'_>) -> Result<Option<NumberingReference>> {
    let mut num_id: Option<String> = None;
    let mut ilvl: Option<u8> = None;

    loop {
        match reader.next()? {
            XmlEvent::Empty(Ns::Wml, e) => match local_name(&e) {
                b"numId" => num_id = xml::val(&e),
                b"ilvl" => ilvl = xml::numeric_val(&e),
                _ => {}
            },
            XmlEvent::Start(..) => reader.skip_element()?,
            XmlEvent::End => break,
            XmlEvent::Eof => return Err(reader.unexpected_eof()),
            _ => {}
        }
    }

    let num_id = num_id.map(|id| id.trim().to_string());
    Ok(match num_id {
        Some(id) if !id.is_empty() && id != "0" => Some(NumberingReference {
            num_id: id,
            ilvl: ilvl.unwrap_or(0),
        }),
        _ => None,
    })
}

//! Paragraph attribute resolution.
//!
//! A paragraph's final attributes come from three cascading sources: its
//! own `<w:pPr>`, its paragraph style (through the `basedOn` chain) and,
//! for list items, its numbering level. Two tracks are kept apart:
//!
//! - the generic indent (`indent`, `hanging`, `firstLine`) of non-list
//!   paragraphs: direct, then style;
//! - the list indent (`listIndentLeft`, `listIndentHanging`) of list
//!   items: direct, then style, then numbering level.
//!
//! Every field resolves on its own. A field no source defines stays out
//! of the attribute map; it is never defaulted to zero.

use crate::model::{attrs, AttributeMap, BlockType};

use super::numbering::NumberingCatalog;
use super::properties::{IndentField, ParagraphProperties};
use super::styles::StyleCatalog;

/// Outline levels Word treats as headings; 9 is "body text".
const MAX_HEADING_OUTLINE_LEVEL: u8 = 8;

/// Block type and attributes computed for one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParagraph {
    pub block_type: BlockType,
    pub attrs: AttributeMap,
}

/// Resolves paragraph formatting against the document's catalogs.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphFormatter<'a> {
    styles: &'a StyleCatalog,
    numbering: &'a NumberingCatalog,
}

impl<'a> ParagraphFormatter<'a> {
    /// Create a formatter over parsed catalogs.
    pub fn new(styles: &'a StyleCatalog, numbering: &'a NumberingCatalog) -> Self {
        Self { styles, numbering }
    }

    /// Compute the block type and attributes of a paragraph.
    pub fn resolve(&self, props: &ParagraphProperties) -> ResolvedParagraph {
        let mut resolved = ResolvedParagraph::default();

        match props.numbering {
            Some(_) => self.resolve_list(props, &mut resolved.attrs),
            None => self.resolve_indent(props, &mut resolved.attrs),
        }

        if let Some(outline) = self.outline_level(props) {
            resolved.block_type = BlockType::Heading;
            resolved
                .attrs
                .insert(attrs::LEVEL.to_string(), (outline + 1).into());
        }

        resolved
    }

    /// One indent field through direct, then style.
    pub fn generic_indent(&self, props: &ParagraphProperties, field: IndentField) -> Option<String> {
        props
            .indent_field(field)
            .map(str::to_string)
            .or_else(|| self.style_indent(props, field))
    }

    /// One list indent field through direct, then style, then numbering level.
    pub fn list_indent(&self, props: &ParagraphProperties, field: IndentField) -> Option<String> {
        let reference = props.numbering.as_ref()?;
        props
            .indent_field(field)
            .map(str::to_string)
            .or_else(|| self.style_indent(props, field))
            .or_else(|| {
                self.numbering
                    .resolve_level(&reference.num_id, reference.ilvl)
                    .and_then(|level| level.indent)
                    .and_then(|ind| field.get(&ind).map(str::to_string))
            })
    }

    /// Heading outline level: the paragraph's own, else its style chain's.
    ///
    /// Levels outside 0..=8 mean "not a heading".
    pub fn outline_level(&self, props: &ParagraphProperties) -> Option<u8> {
        props
            .outline_level
            .or_else(|| {
                props
                    .style_id
                    .as_deref()
                    .and_then(|id| self.styles.effective_outline_level(id))
            })
            .filter(|level| *level <= MAX_HEADING_OUTLINE_LEVEL)
    }

    fn style_indent(&self, props: &ParagraphProperties, field: IndentField) -> Option<String> {
        props
            .style_id
            .as_deref()
            .and_then(|id| self.styles.effective_indent(id, field))
    }

    fn resolve_indent(&self, props: &ParagraphProperties, out: &mut AttributeMap) {
        for (key, field) in [
            (attrs::INDENT, IndentField::Left),
            (attrs::HANGING, IndentField::Hanging),
            (attrs::FIRST_LINE, IndentField::FirstLine),
        ] {
            if let Some(value) = self.generic_indent(props, field) {
                out.insert(key.to_string(), value.into());
            }
        }
    }

    fn resolve_list(&self, props: &ParagraphProperties, out: &mut AttributeMap) {
        let Some(reference) = props.numbering.as_ref() else {
            return;
        };

        out.insert(attrs::LIST_NUM_ID.to_string(), reference.num_id.as_str().into());
        out.insert(attrs::LIST_ILVL.to_string(), reference.ilvl.into());

        match self.numbering.resolve_level(&reference.num_id, reference.ilvl) {
            Some(level) => {
                if let Some(fmt) = level.num_format {
                    out.insert(attrs::LIST_NUM_FMT.to_string(), fmt.into());
                }
                if let Some(text) = level.level_text {
                    out.insert(attrs::LIST_LVL_TEXT.to_string(), text.into());
                }
            }
            None => log::debug!(
                "no numbering level for numId '{}' ilvl {}",
                reference.num_id,
                reference.ilvl
            ),
        }

        for (key, field) in [
            (attrs::LIST_INDENT_LEFT, IndentField::Left),
            (attrs::LIST_INDENT_HANGING, IndentField::Hanging),
        ] {
            if let Some(value) = self.list_indent(props, field) {
                out.insert(key.to_string(), value.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::properties::{Indent, NumberingReference};

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
    <w:style w:type="paragraph" w:styleId="Heading1">
        <w:name w:val="heading 1"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading1Flush">
        <w:basedOn w:val="Heading1"/>
        <w:pPr><w:ind w:left="0" w:hanging="0"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="FirstLineOnly">
        <w:pPr><w:ind w:firstLine="720"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="ListFlush">
        <w:pPr><w:ind w:left="0" w:hanging="0"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="ListLeftOnly">
        <w:pPr><w:ind w:left="200"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="BodyText">
        <w:pPr><w:outlineLvl w:val="9"/></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="LoopA"><w:basedOn w:val="LoopB"/></w:style>
    <w:style w:type="paragraph" w:styleId="LoopB"><w:basedOn w:val="LoopA"/></w:style>
</w:styles>"#;

    const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="0">
            <w:start w:val="1"/>
            <w:numFmt w:val="decimal"/>
            <w:lvlText w:val="%1."/>
            <w:pPr><w:ind w:left="720" w:hanging="720"/></w:pPr>
        </w:lvl>
        <w:lvl w:ilvl="1">
            <w:start w:val="1"/>
            <w:numFmt w:val="lowerLetter"/>
            <w:lvlText w:val="%2)"/>
            <w:pPr><w:ind w:left="1440" w:hanging="720"/></w:pPr>
        </w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="1">
        <w:lvl w:ilvl="0">
            <w:start w:val="1"/>
            <w:numFmt w:val="decimalFullWidth"/>
            <w:lvlText w:val="第%1条"/>
        </w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
    <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

    fn catalogs() -> (StyleCatalog, NumberingCatalog) {
        (
            StyleCatalog::parse(STYLES).unwrap(),
            NumberingCatalog::parse(NUMBERING).unwrap(),
        )
    }

    fn list(num_id: &str, ilvl: u8) -> Option<NumberingReference> {
        Some(NumberingReference {
            num_id: num_id.to_string(),
            ilvl,
        })
    }

    fn text_attr<'r>(resolved: &'r ResolvedParagraph, key: &str) -> Option<&'r str> {
        resolved.attrs.get(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_plain_paragraph_has_no_attrs() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties::default());
        assert_eq!(resolved.block_type, BlockType::Paragraph);
        assert!(resolved.attrs.is_empty());
    }

    #[test]
    fn test_list_indent_from_numbering() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            numbering: list("1", 0),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("720"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("720"));
        assert_eq!(text_attr(&resolved, attrs::LIST_NUM_ID), Some("1"));
        assert_eq!(resolved.attrs[attrs::LIST_ILVL].as_i64(), Some(0));
        assert_eq!(text_attr(&resolved, attrs::LIST_NUM_FMT), Some("decimal"));
        assert_eq!(text_attr(&resolved, attrs::LIST_LVL_TEXT), Some("%1."));
        // list paragraphs do not carry the generic indent track
        assert!(!resolved.attrs.contains_key(attrs::INDENT));
        assert!(!resolved.attrs.contains_key(attrs::HANGING));
    }

    #[test]
    fn test_direct_zero_overrides_numbering() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            indent: Some(Indent {
                left: Some("0".to_string()),
                hanging: Some("0".to_string()),
                first_line: None,
            }),
            numbering: list("1", 0),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("0"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("0"));
    }

    #[test]
    fn test_style_zero_overrides_numbering() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("ListFlush".to_string()),
            numbering: list("1", 1),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("0"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("0"));
        assert_eq!(text_attr(&resolved, attrs::LIST_NUM_FMT), Some("lowerLetter"));
    }

    #[test]
    fn test_list_fields_cascade_independently() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        // style gives left only; hanging falls through to the numbering level
        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("ListLeftOnly".to_string()),
            numbering: list("1", 1),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("200"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("720"));

        // direct hanging only; left comes from the style
        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("ListLeftOnly".to_string()),
            indent: Some(Indent {
                hanging: Some("360".to_string()),
                ..Default::default()
            }),
            numbering: list("1", 0),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("200"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("360"));
    }

    #[test]
    fn test_first_line_only_style() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("FirstLineOnly".to_string()),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::FIRST_LINE), Some("720"));
        assert!(!resolved.attrs.contains_key(attrs::INDENT));
        assert!(!resolved.attrs.contains_key(attrs::HANGING));
        assert!(!resolved.attrs.contains_key(attrs::LIST_INDENT_LEFT));
    }

    #[test]
    fn test_direct_indent_wins_over_style() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let props = ParagraphProperties {
            style_id: Some("FirstLineOnly".to_string()),
            indent: Some(Indent {
                left: Some("360".to_string()),
                first_line: Some("0".to_string()),
                hanging: None,
            }),
            ..Default::default()
        };
        let resolved = formatter.resolve(&props);
        assert_eq!(text_attr(&resolved, attrs::INDENT), Some("360"));
        assert_eq!(text_attr(&resolved, attrs::FIRST_LINE), Some("0"));
        assert_eq!(formatter.list_indent(&props, IndentField::Left), None);
    }

    #[test]
    fn test_direct_measure_beats_numbering_as_written() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            indent: Some(Indent {
                left: Some("0720".to_string()),
                hanging: Some("0.25in".to_string()),
                first_line: None,
            }),
            numbering: list("1", 0),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("0720"));
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_HANGING), Some("0.25in"));
    }

    #[test]
    fn test_heading_from_style_chain() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("Heading1".to_string()),
            ..Default::default()
        });
        assert_eq!(resolved.block_type, BlockType::Heading);
        assert_eq!(resolved.attrs[attrs::LEVEL].as_i64(), Some(1));

        // inherited through basedOn
        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("Heading1Flush".to_string()),
            ..Default::default()
        });
        assert_eq!(resolved.block_type, BlockType::Heading);
        assert_eq!(text_attr(&resolved, attrs::INDENT), Some("0"));
    }

    #[test]
    fn test_body_text_outline_level_is_not_heading() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("BodyText".to_string()),
            ..Default::default()
        });
        assert_eq!(resolved.block_type, BlockType::Paragraph);
        assert!(!resolved.attrs.contains_key(attrs::LEVEL));
    }

    #[test]
    fn test_direct_outline_level_wins() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("Heading1".to_string()),
            outline_level: Some(2),
            ..Default::default()
        });
        assert_eq!(resolved.attrs[attrs::LEVEL].as_i64(), Some(3));
    }

    #[test]
    fn test_full_width_numbering_verbatim() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            numbering: list("2", 0),
            ..Default::default()
        });
        assert_eq!(text_attr(&resolved, attrs::LIST_NUM_FMT), Some("decimalFullWidth"));
        assert_eq!(text_attr(&resolved, attrs::LIST_LVL_TEXT), Some("第%1条"));
        assert!(!resolved.attrs.contains_key(attrs::LIST_INDENT_LEFT));
    }

    #[test]
    fn test_unknown_references_are_omitted() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("Missing".to_string()),
            numbering: list("42", 0),
            ..Default::default()
        });
        assert_eq!(resolved.block_type, BlockType::Paragraph);
        assert_eq!(text_attr(&resolved, attrs::LIST_NUM_ID), Some("42"));
        assert!(!resolved.attrs.contains_key(attrs::LIST_NUM_FMT));
        assert!(!resolved.attrs.contains_key(attrs::LIST_LVL_TEXT));
        assert!(!resolved.attrs.contains_key(attrs::LIST_INDENT_LEFT));
        assert!(!resolved.attrs.contains_key(attrs::LIST_INDENT_HANGING));
    }

    #[test]
    fn test_style_cycle_resolves_to_absent() {
        let (styles, numbering) = catalogs();
        let formatter = ParagraphFormatter::new(&styles, &numbering);

        let resolved = formatter.resolve(&ParagraphProperties {
            style_id: Some("LoopA".to_string()),
            numbering: list("1", 0),
            ..Default::default()
        });
        assert_eq!(resolved.block_type, BlockType::Paragraph);
        assert_eq!(text_attr(&resolved, attrs::LIST_INDENT_LEFT), Some("720"));
        assert_eq!(styles.reported_cycles(), vec!["LoopA".to_string()]);
    }
}

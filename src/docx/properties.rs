//! Paragraph property values shared by styles, numbering and paragraphs.

use quick_xml::events::BytesStart;

use super::xml;

/// Indentation from a `<w:ind>` element.
///
/// Each field is tri-state: `None` means the source did not specify it,
/// `Some("0")` is an explicit zero that overrides inherited values.
/// Values are kept as written, so twips (`720`, `0720`) and universal
/// measures (`1in`, `-0.5cm`) both pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indent {
    pub left: Option<String>,
    pub hanging: Option<String>,
    pub first_line: Option<String>,
}

impl Indent {
    /// Read the attributes of a `<w:ind>` element.
    ///
    /// `w:start` is accepted when `w:left` is absent.
    pub(crate) fn from_element(e: &BytesStart<'_>) -> Self {
        Self {
            left: xml::measure(e, b"left").or_else(|| xml::measure(e, b"start")),
            hanging: xml::measure(e, b"hanging"),
            first_line: xml::measure(e, b"firstLine"),
        }
    }

    /// Check if no field is specified.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.hanging.is_none() && self.first_line.is_none()
    }

    /// Overlay `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: &Indent) {
        if other.left.is_some() {
            self.left = other.left.clone();
        }
        if other.hanging.is_some() {
            self.hanging = other.hanging.clone();
        }
        if other.first_line.is_some() {
            self.first_line = other.first_line.clone();
        }
    }
}

/// Selects one field of an [`Indent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentField {
    Left,
    Hanging,
    FirstLine,
}

impl IndentField {
    /// Read this field from an indent.
    pub fn get(self, indent: &Indent) -> Option<&str> {
        match self {
            IndentField::Left => indent.left.as_deref(),
            IndentField::Hanging => indent.hanging.as_deref(),
            IndentField::FirstLine => indent.first_line.as_deref(),
        }
    }
}

/// A paragraph's `<w:numPr>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingReference {
    pub num_id: String,
    pub ilvl: u8,
}

/// Properties a paragraph states directly in its own `<w:pPr>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphProperties {
    /// `<w:pStyle w:val>`
    pub style_id: Option<String>,
    /// `<w:ind>`, if the element is present
    pub indent: Option<Indent>,
    /// `<w:numPr>`; `numId="0"` removes numbering and yields `None`
    pub numbering: Option<NumberingReference>,
    /// `<w:outlineLvl w:val>`
    pub outline_level: Option<u8>,
}

impl ParagraphProperties {
    /// Direct value of one indent field.
    pub fn indent_field(&self, field: IndentField) -> Option<&str> {
        self.indent.as_ref().and_then(|ind| field.get(ind))
    }
}

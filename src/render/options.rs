//! Rendering options configuration.

/// Options for plain-text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit a line for paragraphs without text
    pub include_empty_paragraphs: bool,

    /// Prefix headings with `#` repeated to the heading level
    pub heading_markers: bool,

    /// Indent list items by two spaces per list level
    pub list_indent: bool,

    /// Normalize text to Unicode NFC
    pub normalize_unicode: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_empty_paragraphs: false,
            heading_markers: false,
            list_indent: true,
            normalize_unicode: true,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep empty paragraphs as blank lines.
    pub fn with_empty_paragraphs(mut self, include: bool) -> Self {
        self.include_empty_paragraphs = include;
        self
    }

    /// Enable `#` heading markers.
    pub fn with_heading_markers(mut self, enable: bool) -> Self {
        self.heading_markers = enable;
        self
    }

    /// Enable list indentation.
    pub fn with_list_indent(mut self, enable: bool) -> Self {
        self.list_indent = enable;
        self
    }

    /// Enable NFC normalization.
    pub fn with_normalize_unicode(mut self, enable: bool) -> Self {
        self.normalize_unicode = enable;
        self
    }
}

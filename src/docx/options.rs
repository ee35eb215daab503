//! Reader options configuration.

/// What to do with body children other than `<w:p>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyElements {
    /// Leave tables, content controls and the like out of the tree
    #[default]
    Skip,
    /// Emit them as flat `passthrough` nodes carrying their text
    Passthrough,
}

/// Options for building a document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Handling of non-paragraph body children
    pub body_elements: BodyElements,

    /// Map `<w:tab/>` to `\t` and `<w:br/>`, `<w:cr/>` to `\n` in paragraph text
    pub run_breaks: bool,

    /// Emit `attrs.styleId` on paragraphs that reference a style
    pub style_id_attr: bool,
}

impl ReaderOptions {
    /// Create new reader options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set handling of non-paragraph body children.
    pub fn with_body_elements(mut self, mode: BodyElements) -> Self {
        self.body_elements = mode;
        self
    }

    /// Shorthand for [`BodyElements::Passthrough`].
    pub fn with_passthrough(self) -> Self {
        self.with_body_elements(BodyElements::Passthrough)
    }

    /// Keep tab and line break characters in paragraph text.
    pub fn with_run_breaks(mut self, keep: bool) -> Self {
        self.run_breaks = keep;
        self
    }

    /// Emit the paragraph style ID as an attribute.
    pub fn with_style_id_attr(mut self, emit: bool) -> Self {
        self.style_id_attr = emit;
        self
    }
}

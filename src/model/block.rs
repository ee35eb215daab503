//! Block nodes and their attribute maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute keys written by the reader.
pub mod attrs {
    /// Left indent of a non-list paragraph as written, usually twips.
    pub const INDENT: &str = "indent";
    /// Hanging indent of a non-list paragraph as written, usually twips.
    pub const HANGING: &str = "hanging";
    /// First-line indent of a non-list paragraph as written, usually twips.
    pub const FIRST_LINE: &str = "firstLine";
    /// Numbering instance the paragraph belongs to.
    pub const LIST_NUM_ID: &str = "listNumId";
    /// Zero-based list level.
    pub const LIST_ILVL: &str = "listIlvl";
    /// Number format of the list level (`decimal`, `bullet`, ...).
    pub const LIST_NUM_FMT: &str = "listNumFmt";
    /// Level text template (`%1.`, `第%1条`, ...).
    pub const LIST_LVL_TEXT: &str = "listLvlText";
    /// Resolved list left indent as written, usually twips.
    pub const LIST_INDENT_LEFT: &str = "listIndentLeft";
    /// Resolved list hanging indent as written, usually twips.
    pub const LIST_INDENT_HANGING: &str = "listIndentHanging";
    /// One-based heading depth.
    pub const LEVEL: &str = "level";
    /// Paragraph style reference.
    pub const STYLE_ID: &str = "styleId";
    /// Element name of a passthrough node.
    pub const ELEMENT: &str = "element";
}

/// Kind of a block node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading,
    /// A non-paragraph body element carried through as flat text.
    Passthrough,
}

/// An attribute value: string, number or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(i64),
    Text(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// The value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a number, if it is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<u8> for AttrValue {
    fn from(n: u8) -> Self {
        AttrValue::Number(i64::from(n))
    }
}

/// Attributes of a block, ordered by key for stable output.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// One block of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockNode {
    /// Block kind
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Resolved attributes; absent keys were not resolved from any source
    #[serde(default)]
    pub attrs: AttributeMap,

    /// Concatenated run text
    #[serde(default)]
    pub text: String,
}

impl BlockNode {
    /// Create a plain paragraph node.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Paragraph,
            attrs: AttributeMap::new(),
            text: text.into(),
        }
    }

    /// Create a heading node with the given one-based level.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        let mut node = Self {
            block_type: BlockType::Heading,
            attrs: AttributeMap::new(),
            text: text.into(),
        };
        node.set_attr(attrs::LEVEL, level);
        node
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// Get an attribute.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Get a text attribute.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    /// Get a numeric attribute.
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        self.attr(key).and_then(AttrValue::as_i64)
    }

    /// Check if this node is a heading.
    pub fn is_heading(&self) -> bool {
        self.block_type == BlockType::Heading
    }

    /// Heading level (1-based), if this node is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        if !self.is_heading() {
            return None;
        }
        self.attr_i64(attrs::LEVEL)
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Check if this node carries list metadata.
    pub fn is_list_item(&self) -> bool {
        self.attrs.contains_key(attrs::LIST_NUM_ID)
    }

    /// List level, if this node is a list item.
    pub fn list_level(&self) -> Option<u8> {
        self.attr_i64(attrs::LIST_ILVL)
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Check if the node has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_node() {
        let node = BlockNode::heading(2, "Scope");
        assert!(node.is_heading());
        assert_eq!(node.heading_level(), Some(2));
        assert!(!node.is_list_item());
    }

    #[test]
    fn test_paragraph_has_no_level() {
        let mut node = BlockNode::paragraph("body");
        node.set_attr(attrs::LEVEL, 3u8);
        assert_eq!(node.heading_level(), None);
    }

    #[test]
    fn test_serialization_shape() {
        let mut node = BlockNode::paragraph("Item");
        node.set_attr(attrs::LIST_NUM_ID, "1");
        node.set_attr(attrs::LIST_ILVL, 0u8);
        node.set_attr(attrs::LIST_INDENT_LEFT, "720");

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"type":"paragraph","attrs":{"listIlvl":0,"listIndentLeft":"720","listNumId":"1"},"text":"Item"}"#
        );

        let back: BlockNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.list_level(), Some(0));
    }
}

//! Document tree structure.

use super::BlockNode;
use serde::{Deserialize, Serialize};

/// The reader's output: blocks in document order, without nesting.
///
/// List items are flat paragraphs carrying list attributes, not children
/// of a list container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Content blocks
    #[serde(default)]
    pub content: Vec<BlockNode>,
}

impl DocumentTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block.
    pub fn push(&mut self, block: BlockNode) {
        self.content.push(block);
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the tree has no blocks.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterate over heading blocks.
    pub fn headings(&self) -> impl Iterator<Item = &BlockNode> {
        self.content.iter().filter(|b| b.is_heading())
    }

    /// Iterate over list-item blocks.
    pub fn list_items(&self) -> impl Iterator<Item = &BlockNode> {
        self.content.iter().filter(|b| b.is_list_item())
    }

    /// Extract all text content, one block per line.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for block in &self.content {
            text.push_str(&block.text);
            text.push('\n');
        }
        text.trim().to_string()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to JSON string (compact).
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

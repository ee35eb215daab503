//! JSON renderer implementation.

use crate::error::Result;
use crate::model::DocumentTree;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a document tree to JSON.
pub fn to_json(tree: &DocumentTree, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(tree)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(tree)?,
    };
    Ok(json)
}

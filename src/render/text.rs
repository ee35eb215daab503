//! Plain text renderer implementation.

use crate::model::{BlockNode, DocumentTree};
use unicode_normalization::UnicodeNormalization;

use super::options::RenderOptions;

/// Convert a document tree to plain text, one block per line.
pub fn to_text(tree: &DocumentTree, options: &RenderOptions) -> String {
    let mut output = String::new();

    for block in &tree.content {
        if block.text.trim().is_empty() && !options.include_empty_paragraphs {
            continue;
        }
        render_block(block, options, &mut output);
        output.push('\n');
    }

    let output = output.trim_end();
    if options.normalize_unicode {
        output.nfc().collect()
    } else {
        output.to_string()
    }
}

fn render_block(block: &BlockNode, options: &RenderOptions, output: &mut String) {
    if let Some(level) = block.heading_level().filter(|_| options.heading_markers) {
        output.push_str(&"#".repeat(level as usize));
        output.push(' ');
    } else if let Some(level) = block.list_level().filter(|_| options.list_indent) {
        output.push_str(&"  ".repeat(level as usize));
    }
    output.push_str(&block.text);
}

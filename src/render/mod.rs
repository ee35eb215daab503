//! Output rendering for document trees.
//!
//! # Example
//!
//! ```no_run
//! use docxtree::{load_file, render::*};
//!
//! let tree = load_file("document.docx")?;
//!
//! // Render to plain text
//! let text = to_text(&tree, &RenderOptions::default().with_heading_markers(true));
//!
//! // Render to JSON
//! let json = to_json(&tree, JsonFormat::Pretty)?;
//! # Ok::<(), docxtree::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use text::to_text;

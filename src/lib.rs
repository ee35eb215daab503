//! # docxtree
//!
//! Word (.docx) reader producing a flat block tree.
//!
//! Each paragraph of the main document becomes one block carrying its
//! text and the attributes resolved from direct formatting, the
//! paragraph style chain and the numbering definitions: indentation,
//! list descriptors and heading levels.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docxtree::load_file;
//!
//! let tree = load_file("document.docx")?;
//! for block in &tree.content {
//!     if let Some(level) = block.heading_level() {
//!         println!("{} {}", "#".repeat(level as usize), block.text);
//!     }
//! }
//!
//! // JSON in the {"content": [...]} shape
//! println!("{}", tree.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Step-wise Reading
//!
//! ```no_run
//! use docxtree::docx::{DocxReader, ReaderOptions};
//!
//! let reader = DocxReader::open("report.docx")?
//!     .with_options(ReaderOptions::new().with_run_breaks(true));
//! println!("numbering defined: {}", !reader.numbering().is_empty());
//! let tree = reader.parse()?;
//! # Ok::<(), docxtree::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: [`load_file_async`] reading the file with Tokio

pub mod container;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use container::{DocumentPackage, Relationship, Relationships};
pub use docx::{BodyElements, DocxReader, ReaderOptions};
pub use error::{Error, Result};
pub use model::{attrs, AttrValue, AttributeMap, BlockNode, BlockType, DocumentTree};
pub use render::{to_json, to_text, JsonFormat, RenderOptions};

use std::path::Path;

/// Load a document tree from the bytes of a `.docx` package.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.docx")?;
/// let tree = docxtree::load(&data)?;
/// println!("{} blocks", tree.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load(data: &[u8]) -> Result<DocumentTree> {
    load_with_options(data, &ReaderOptions::default())
}

/// Load a document tree from bytes with options.
pub fn load_with_options(data: &[u8], options: &ReaderOptions) -> Result<DocumentTree> {
    DocxReader::from_bytes(data)?
        .with_options(options.clone())
        .parse()
}

/// Load a document tree from a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<DocumentTree> {
    DocxReader::open(path)?.parse()
}

/// Extract plain text from a document, one block per line.
///
/// # Example
///
/// ```no_run
/// use docxtree::extract_text;
///
/// let text = extract_text("document.docx")?;
/// println!("{}", text);
/// # Ok::<(), docxtree::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let tree = load_file(path)?;
    Ok(tree.plain_text())
}

/// Load a document tree from a file, reading it asynchronously.
///
/// Parsing itself runs on the calling task.
#[cfg(feature = "async")]
pub async fn load_file_async(path: impl AsRef<Path>) -> Result<DocumentTree> {
    let data = tokio::fs::read(path.as_ref()).await?;
    load(&data)
}

//! Output model of the reader.
//!
//! Parsers resolve OOXML formatting into these structures; renderers and
//! downstream importers consume them without knowing about ZIP or XML.

mod block;
mod document;

pub use block::*;
pub use document::*;

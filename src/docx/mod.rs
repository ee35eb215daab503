//! DOCX (Word) document reader.
//!
//! This module turns the main document part of a `.docx` package into a
//! flat [`DocumentTree`](crate::model::DocumentTree), resolving paragraph
//! indentation, list metadata and headings against `styles.xml` and
//! `numbering.xml`.

mod numbering;
mod options;
mod parser;
mod properties;
mod reader;
mod resolve;
mod styles;
mod xml;

pub use numbering::{AbstractNumbering, NumberingCatalog, NumberingInstance, NumberingLevel};
pub use options::{BodyElements, ReaderOptions};
pub use properties::{Indent, IndentField, NumberingReference, ParagraphProperties};
pub use reader::DocxReader;
pub use resolve::{ParagraphFormatter, ResolvedParagraph};
pub use styles::{StyleCatalog, StyleDefinition, StyleType};

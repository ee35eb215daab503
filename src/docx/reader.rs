//! DOCX reader: package wiring and catalog loading.

use crate::container::{rel_types, DocumentPackage};
use crate::error::{Error, Result};
use crate::model::DocumentTree;

use super::numbering::NumberingCatalog;
use super::options::ReaderOptions;
use super::parser::TreeBuilder;
use super::resolve::ParagraphFormatter;
use super::styles::StyleCatalog;

/// Conventional location of the main document part.
const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

/// Reader for DOCX (Word) documents.
///
/// Opening a reader locates the main document part and loads the style and
/// numbering catalogs; [`parse`](Self::parse) then builds the tree.
///
/// ```no_run
/// use docxtree::docx::{DocxReader, ReaderOptions};
///
/// let reader = DocxReader::open("report.docx")?
///     .with_options(ReaderOptions::new().with_passthrough());
/// println!("{} styles", reader.styles().len());
/// let tree = reader.parse()?;
/// # Ok::<(), docxtree::Error>(())
/// ```
#[derive(Debug)]
pub struct DocxReader {
    package: DocumentPackage,
    document_part: String,
    styles: StyleCatalog,
    numbering: NumberingCatalog,
    options: ReaderOptions,
}

impl DocxReader {
    /// Open a DOCX file for reading.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let package = DocumentPackage::open(path)?;
        Self::from_package(package)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let package = DocumentPackage::from_bytes(data)?;
        Self::from_package(package)
    }

    /// Create a reader from a loaded package.
    pub fn from_package(package: DocumentPackage) -> Result<Self> {
        let document_part = find_document_part(&package)?;

        // Document relationships wire in styles and numbering
        let relationships = match package.read_relationships(&document_part) {
            Ok(rels) => rels,
            Err(e) => {
                log::warn!("ignoring relationships of {}: {}", document_part, e);
                Default::default()
            }
        };
        let related_part = |kind: &str| {
            relationships
                .find_kind(kind)
                .map(|rel| DocumentPackage::resolve_path(&document_part, &rel.target))
        };

        let styles = match related_part(rel_types::STYLES) {
            Some(path) => load_optional(&package, &path, StyleCatalog::parse),
            None => StyleCatalog::default(),
        };
        let numbering = match related_part(rel_types::NUMBERING) {
            Some(path) => load_optional(&package, &path, NumberingCatalog::parse),
            None => NumberingCatalog::default(),
        };

        Ok(Self {
            package,
            document_part,
            styles,
            numbering,
            options: ReaderOptions::default(),
        })
    }

    /// Replace the reader options.
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Style catalog loaded from the package.
    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    /// Numbering catalog loaded from the package.
    pub fn numbering(&self) -> &NumberingCatalog {
        &self.numbering
    }

    /// Path of the main document part.
    pub fn document_part(&self) -> &str {
        &self.document_part
    }

    /// Get the underlying package.
    pub fn package(&self) -> &DocumentPackage {
        &self.package
    }

    /// Build the document tree.
    pub fn parse(&self) -> Result<DocumentTree> {
        let xml = self.package.read_xml(&self.document_part)?;
        let formatter = ParagraphFormatter::new(&self.styles, &self.numbering);
        let tree = TreeBuilder::new(formatter, &self.options).build(&xml, &self.document_part)?;
        log::debug!("{}: {} blocks", self.document_part, tree.len());
        Ok(tree)
    }
}

/// Locate the main document part through the package relationships,
/// falling back to `word/document.xml`.
fn find_document_part(package: &DocumentPackage) -> Result<String> {
    let from_rels = match package.read_relationships("") {
        Ok(rels) => rels
            .find_kind(rel_types::OFFICE_DOCUMENT)
            .map(|rel| DocumentPackage::resolve_path("", &rel.target)),
        Err(e) => {
            log::warn!("ignoring package relationships: {}", e);
            None
        }
    };

    match from_rels {
        Some(path) if package.exists(&path) => Ok(path),
        Some(path) => {
            log::debug!("officeDocument target '{}' is missing", path);
            fallback_document_part(package)
        }
        None => fallback_document_part(package),
    }
}

fn fallback_document_part(package: &DocumentPackage) -> Result<String> {
    if package.exists(DEFAULT_DOCUMENT_PART) {
        Ok(DEFAULT_DOCUMENT_PART.to_string())
    } else {
        Err(Error::MissingPart(DEFAULT_DOCUMENT_PART.to_string()))
    }
}

/// Parse an optional part; any failure degrades to an empty catalog.
fn load_optional<T: Default>(
    package: &DocumentPackage,
    path: &str,
    parse: impl FnOnce(&str) -> Result<T>,
) -> T {
    let xml = match package.read_xml(path) {
        Ok(xml) => xml,
        Err(Error::MissingPart(_)) => {
            log::debug!("related part {} is missing", path);
            return T::default();
        }
        Err(e) => {
            log::warn!("ignoring {}: {}", path, e);
            return T::default();
        }
    };
    match parse(&xml) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("ignoring malformed {}: {}", path, e);
            T::default()
        }
    }
}

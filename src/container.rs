//! ZIP package loading and relationship resolution for OOXML documents.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Relationship type suffixes, shared by the transitional
/// (`http://schemas.openxmlformats.org/officeDocument/2006/relationships/…`)
/// and strict (`http://purl.oclc.org/ooxml/officeDocument/relationships/…`)
/// namespaces.
pub mod rel_types {
    /// Package relationship to the main document part.
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
    /// Document relationship to `styles.xml`.
    pub const STYLES: &str = "styles";
    /// Document relationship to `numbering.xml`.
    pub const NUMBERING: &str = "numbering";
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

impl Relationship {
    /// Whether the type URI names the given relationship kind.
    ///
    /// Compares the last path segment only, so transitional and strict
    /// URIs both match.
    pub fn is_type(&self, kind: &str) -> bool {
        self.rel_type
            .rsplit('/')
            .next()
            .is_some_and(|last| last == kind)
    }
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the XML of a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::parse("<rels>", e)),
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// First internal relationship of the given kind (see [`Relationship::is_type`]).
    ///
    /// Ties are broken by relationship ID so the answer does not depend on
    /// hash order.
    pub fn find_kind(&self, kind: &str) -> Option<&Relationship> {
        self.by_id
            .values()
            .filter(|rel| !rel.external && rel.is_type(kind))
            .min_by(|a, b| a.id.cmp(&b.id))
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 XML has been decoded into a Rust `String`, the declaration
/// still says `encoding="UTF-16"` and quick-xml would try to decode it again.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM shows up as NULs interleaved with ASCII
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// An OOXML package: every ZIP entry decompressed into a part map.
///
/// Immutable once loaded. Part names are stored without a leading `/`,
/// so lookups are independent of the entries' order in the archive.
#[derive(Clone, Default)]
pub struct DocumentPackage {
    parts: HashMap<String, Vec<u8>>,
}

impl DocumentPackage {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docxtree::container::DocumentPackage;
    ///
    /// let package = DocumentPackage::open("document.docx")?;
    /// assert!(package.exists("word/document.xml"));
    /// # Ok::<(), docxtree::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load a package from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ZIP_MAGIC.len() || data[..ZIP_MAGIC.len()] != ZIP_MAGIC {
            return Err(Error::Package("not a ZIP archive".to_string()));
        }
        Self::from_reader(Cursor::new(data))
    }

    /// Load a package from a seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = HashMap::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = normalize_part_name(entry.name());
            // the declared size is untrusted, so let the buffer grow as read
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| Error::Package(format!("{}: {}", name, e)))?;
            parts.insert(name, data);
        }

        log::debug!("loaded package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Raw bytes of a part.
    pub fn part(&self, path: &str) -> Option<&[u8]> {
        self.parts
            .get(path.trim_start_matches('/'))
            .map(Vec::as_slice)
    }

    /// Read a part as text, decoding UTF-8 or UTF-16.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self
            .part(path)
            .ok_or_else(|| Error::MissingPart(path.to_string()))?;
        decode_xml_bytes(bytes)
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        self.part(path).is_some()
    }

    /// List all part names, sorted.
    pub fn list_parts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parts.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the package has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Relationships of a part, read from its sibling `_rels/<name>.rels`.
    ///
    /// An empty `part_path` (or `/`) reads the package relationships.
    /// A missing .rels part yields an empty collection.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = Self::rels_path_for(part_path);
        match self.read_xml(&rels_path) {
            Ok(xml) => Relationships::parse(&xml).map_err(|e| match e {
                Error::Parse { message, .. } => Error::parse(rels_path, message),
                other => other,
            }),
            Err(Error::MissingPart(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// The .rels path holding the relationships of `part_path`.
    pub fn rels_path_for(part_path: &str) -> String {
        let part_path = part_path.trim_start_matches('/');
        if part_path.is_empty() {
            return "_rels/.rels".to_string();
        }
        match part_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target relative to the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut segments: Vec<&str> = match base.rsplit_once('/') {
            Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        };
        for segment in relative.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        segments.join("/")
    }
}

/// Normalize a ZIP entry name to a part path.
fn normalize_part_name(name: &str) -> String {
    name.trim_start_matches('/').replace('\\', "/")
}

impl std::fmt::Debug for DocumentPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPackage")
            .field("parts", &self.parts.len())
            .finish()
    }
}

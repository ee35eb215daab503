//! Namespace-aware WordprocessingML reading helpers.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// WordprocessingML namespace (transitional).
pub(crate) const WML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// WordprocessingML namespace (strict).
pub(crate) const WML_STRICT_NS: &[u8] = b"http://purl.oclc.org/ooxml/wordprocessingml/main";
/// Markup compatibility namespace.
pub(crate) const MC_NS: &[u8] = b"http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Namespace an element resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ns {
    Wml,
    MarkupCompat,
    Other,
}

/// One event from a part, with its element namespace already resolved.
pub(crate) enum XmlEvent<'a> {
    Start(Ns, BytesStart<'a>),
    Empty(Ns, BytesStart<'a>),
    End,
    Text(BytesText<'a>),
    Eof,
}

/// Pull reader over one part.
pub(crate) struct PartReader<'a> {
    inner: NsReader<&'a [u8]>,
    part: &'a str,
}

impl<'a> PartReader<'a> {
    /// Create a reader over `xml`; `part` names it in errors.
    pub(crate) fn new(xml: &'a str, part: &'a str) -> Self {
        let mut inner = NsReader::from_str(xml);
        // w:t content is significant, keep whitespace
        inner.config_mut().trim_text(false);
        Self { inner, part }
    }

    /// Read the next event we care about.
    pub(crate) fn next(&mut self) -> Result<XmlEvent<'a>> {
        loop {
            let (resolved, event) = self
                .inner
                .read_resolved_event()
                .map_err(|e| Error::parse(self.part, e))?;
            let ns = classify(&resolved);
            return Ok(match event {
                Event::Start(e) => XmlEvent::Start(ns, e),
                Event::Empty(e) => XmlEvent::Empty(ns, e),
                Event::End(_) => XmlEvent::End,
                Event::Text(t) => XmlEvent::Text(t),
                Event::Eof => XmlEvent::Eof,
                _ => continue,
            });
        }
    }

    /// Skip the rest of an element whose start tag was just read.
    pub(crate) fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()? {
                XmlEvent::Start(..) => depth += 1,
                XmlEvent::End => depth -= 1,
                XmlEvent::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Decode a text event.
    pub(crate) fn text(&self, t: &BytesText<'_>) -> Result<String> {
        t.unescape()
            .map(|s| s.into_owned())
            .map_err(|e| Error::parse(self.part, e))
    }

    /// Error for a document that ends inside an open element.
    pub(crate) fn unexpected_eof(&self) -> Error {
        Error::parse(self.part, "unexpected end of document")
    }
}

fn classify(resolved: &ResolveResult<'_>) -> Ns {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) if *ns == WML_NS || *ns == WML_STRICT_NS => Ns::Wml,
        ResolveResult::Bound(Namespace(ns)) if *ns == MC_NS => Ns::MarkupCompat,
        _ => Ns::Other,
    }
}

/// Local name of an element.
pub(crate) fn local_name<'e>(e: &'e BytesStart<'_>) -> &'e [u8] {
    e.local_name().into_inner()
}

/// Value of the attribute with the given local name (`w:val` → `b"val"`).
pub(crate) fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
        })
}

/// `w:val` of an element.
pub(crate) fn val(e: &BytesStart<'_>) -> Option<String> {
    attr(e, b"val")
}

/// A measurement attribute, kept exactly as written.
///
/// Presence is what matters to the cascade: `0720` and `1in` are both
/// values, even though only the first is plain twips. Blank values count
/// as absent.
pub(crate) fn measure(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    let raw = attr(e, local)?;
    if raw.trim().is_empty() {
        log::debug!("ignoring blank {} measurement", String::from_utf8_lossy(local));
        return None;
    }
    Some(raw)
}

/// A numeric `w:val`; unparsable values count as absent.
pub(crate) fn numeric_val<T: std::str::FromStr>(e: &BytesStart<'_>) -> Option<T> {
    val(e).and_then(|v| v.trim().parse().ok())
}

//! Generic XML element trees
//!
//! Schema files are first decoded to UTF-8 (honouring a BOM or the
//! encoding named in the XML declaration), then tokenized with quick-xml
//! into a small owned tree that the schema parser walks.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::split_qname;

/// One node of a tokenized schema file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Local name (prefix stripped)
    pub name: String,
    /// Namespace prefix as written in the source, if any
    pub prefix: Option<String>,
    /// Attributes keyed by local name, in source order
    pub attributes: IndexMap<String, String>,
    /// Namespace declarations on this element (`""` is the default namespace)
    pub namespaces: IndexMap<String, String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build an element from an opening or self-closing tag
    fn from_tag(tag: &BytesStart) -> Result<Self> {
        let qname = tag.name();
        let qname = std::str::from_utf8(qname.as_ref())
            .map_err(|e| Error::Xml(format!("Tag name is not UTF-8: {}", e)))?;

        let (prefix, local) = split_qname(qname);
        let mut element = Element::new(local);
        element.prefix = prefix.map(str::to_string);

        for attr in tag.attributes() {
            let attr = attr.map_err(|e| Error::Xml(format!("Bad attribute on <{}>: {}", qname, e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Attribute name is not UTF-8: {}", e)))?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Bad value for attribute '{}': {}", key, e)))?
                .into_owned();

            match key.strip_prefix("xmlns") {
                Some("") => {
                    element.namespaces.insert(String::new(), value);
                }
                Some(rest) if rest.starts_with(':') => {
                    element.namespaces.insert(rest[1..].to_string(), value);
                }
                _ => {
                    let (_, local) = split_qname(key);
                    element.attributes.insert(local.to_string(), value);
                }
            }
        }

        Ok(element)
    }

    /// Local name of the element
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First child with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.name == local_name)
    }
}

/// A tokenized schema file
#[derive(Debug, Default)]
pub struct Document {
    /// Document element; `None` when the input holds no element at all
    pub root: Option<Element>,
}

impl Document {
    /// Tokenize raw bytes in any supported encoding
    pub fn from_bytes(bytes: &[u8], limits: &Limits) -> Result<Self> {
        let text = decode_source(bytes)?;
        Self::parse_with_limits(&text, limits)
    }

    /// Tokenize UTF-8 text under the default limits
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Tokenize UTF-8 text
    ///
    /// Only elements and their attributes are kept. Text, comments,
    /// processing instructions and the XML declaration are dropped.
    /// Nesting deeper than `limits.max_xml_depth` is rejected.
    pub fn parse_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        // open elements, innermost last
        let mut open: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Xml(format!("Malformed XML near byte {}: {}", reader.buffer_position(), e))
            })?;

            let closed = match event {
                Event::Start(tag) => {
                    limits.check_xml_depth(open.len() + 1)?;
                    open.push(Element::from_tag(&tag)?);
                    None
                }
                Event::Empty(tag) => {
                    limits.check_xml_depth(open.len() + 1)?;
                    Some(Element::from_tag(&tag)?)
                }
                Event::End(_) => open.pop(),
                Event::Eof => break,
                _ => None,
            };

            if let Some(element) = closed {
                match open.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::Xml(format!(
                "Document ends inside <{}>",
                unclosed.name
            )));
        }

        Ok(Self { root })
    }

    /// Document element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

/// Decode raw schema bytes to UTF-8 text
///
/// A byte order mark wins; otherwise the `encoding` pseudo-attribute of
/// the XML declaration is looked up as a WHATWG label (so `Windows-1252`,
/// `ISO-8859-1` and `latin1` all work). Without either, UTF-8 is assumed.
pub fn decode_source(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return transcode(&bytes[bom_len..], encoding);
    }

    let encoding = match declared_encoding(bytes)? {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::Encoding(format!("Unknown charset: {}", label)))?,
        None => UTF_8,
    };

    // UTF-16 labels cannot appear in an ASCII declaration without a BOM
    if encoding != UTF_8 && encoding.output_encoding() == UTF_8 {
        return Err(Error::Encoding(format!(
            "Declared encoding {} requires a byte order mark",
            encoding.name()
        )));
    }

    transcode(bytes, encoding)
}

fn transcode<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Result<Cow<'a, str>> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(Error::Encoding(format!(
            "Invalid byte sequence for encoding {}",
            encoding.name()
        )));
    }
    Ok(text)
}

/// Read the `encoding` value from a leading XML declaration, if any
fn declared_encoding(bytes: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(decl)) => {
                return match decl.encoding() {
                    Some(Ok(label)) => Ok(Some(String::from_utf8_lossy(&label).into_owned())),
                    Some(Err(e)) => Err(Error::Xml(format!("Malformed XML declaration: {}", e))),
                    None => Ok(None),
                };
            }
            // leading whitespace before the declaration
            Ok(Event::Text(t)) if t.iter().all(u8::is_ascii_whitespace) => {}
            Ok(_) | Err(_) => return Ok(None),
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_root() {
        let doc = Document::parse("<!-- nothing here -->").unwrap();
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_text_is_dropped() {
        let doc = Document::parse("<schema><documentation> Titles </documentation></schema>").unwrap();

        let schema = doc.root().unwrap();
        assert_eq!(schema.local_name(), "schema");
        assert_eq!(schema.children.len(), 1);
        assert_eq!(schema.children[0], Element::new("documentation"));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let limits = Limits {
            max_xml_depth: 3,
            ..Limits::default()
        };
        assert!(Document::parse_with_limits("<a><b><c/></b></a>", &limits).is_ok());

        let err = Document::parse_with_limits("<a><b><c><d/></c></b></a>", &limits).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
        assert!(err.to_string().contains("XML nesting depth 4"));
    }

    #[test]
    fn test_very_deep_document_fails_cleanly() {
        let depth = 50_000;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let result = Document::parse(&xml);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_prefixes_are_split_off() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:element name="a" xs:form="qualified"/></xs:schema>"#;
        let doc = Document::parse(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.local_name(), "schema");
        assert_eq!(root.prefix.as_deref(), Some("xs"));
        assert_eq!(
            root.namespaces.get("xs").map(String::as_str),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        let element = &root.children[0];
        assert_eq!(element.get_attribute("name"), Some("a"));
        assert_eq!(element.get_attribute("form"), Some("qualified"));
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let xml = r#"<root z="1" a="2" m="3"/>"#;
        let root = Document::parse(xml).unwrap().root.unwrap();
        let keys: Vec<&str> = root.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_child_lookup() {
        let xml = r#"<complexType><attribute name="a"/><sequence/><attribute name="b"/></complexType>"#;
        let ct = Document::parse(xml).unwrap().root.unwrap();
        let names: Vec<_> = ct
            .children
            .iter()
            .filter_map(|a| a.get_attribute("name"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(ct.find_child("sequence").is_some());
        assert!(ct.find_child("choice").is_none());
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        let result = Document::parse("<schema><element name=\"a\">");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = Document::parse("<root><child></root>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_decode_utf8_without_declaration() {
        let text = decode_source("<a>é</a>".as_bytes()).unwrap();
        assert_eq!(text, "<a>é</a>");
    }

    #[test]
    fn test_decode_windows_1252() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"Windows-1252\"?><a name=\"caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\"/>");

        let doc = Document::from_bytes(&bytes, &Limits::default()).unwrap();
        assert_eq!(doc.root.unwrap().get_attribute("name"), Some("café"));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>x</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_source(&bytes).unwrap(), "<a>x</a>");
    }

    #[test]
    fn test_unknown_charset_is_rejected() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"klingon-1\"?><a/>";
        let err = decode_source(bytes).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.to_string().contains("klingon-1"));
    }
}

//! A minimal namespace-aware DOM
//!
//! [`Document`] owns an optional root [`Element`]; elements own their
//! attribute nodes ([`Attr`]) and children. Documents are read with
//! quick-xml, resolving every prefix against the declarations in scope,
//! and written back with [`WriterConfig`] controlling the output shape.

mod element;
mod writer;

pub use element::{Attr, Element};
pub use writer::WriterConfig;

use crate::error::{Error, IoError, Result};
use crate::limits::Limits;
use crate::names::{split_qname, validate_name, validate_qname};
use crate::namespaces::{NamespaceContext, QName, XMLNS_PREFIX, XML_NAMESPACE, XML_PREFIX};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// XML Document representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Option<Element>,
    version: String,
    encoding: Option<String>,
}

impl Document {
    /// Create a new empty XML 1.0, UTF-8 document
    pub fn new() -> Self {
        Self {
            root: None,
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
        }
    }

    /// XML version from the declaration
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Encoding from the declaration
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Create an element that is in no namespace
    pub fn create_element(&self, name: &str) -> Result<Element> {
        validate_name(name)?;
        Ok(Element::new(QName::local(name)))
    }

    /// Create a namespaced element
    ///
    /// An empty namespace is treated as none. A prefix requires a namespace,
    /// and the reserved prefixes keep their fixed bindings.
    pub fn create_element_ns(&self, namespace: Option<&str>, qualified_name: &str) -> Result<Element> {
        validate_qname(qualified_name)?;
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let (prefix, local) = split_qname(qualified_name);

        match (prefix, namespace) {
            (Some(p), None) => {
                return Err(Error::Namespace(format!(
                    "prefix '{}' requires a namespace",
                    p
                )))
            }
            (Some(XML_PREFIX), Some(ns)) if ns != XML_NAMESPACE => {
                return Err(Error::Namespace(format!(
                    "prefix 'xml' cannot be bound to '{}'",
                    ns
                )))
            }
            _ => {}
        }
        if prefix == Some(XMLNS_PREFIX) || local == XMLNS_PREFIX {
            return Err(Error::Namespace(format!(
                "'{}' is reserved for namespace declarations",
                qualified_name
            )));
        }

        Ok(Element::new(QName::new(namespace, local)).with_prefix(prefix))
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Get the root element mutably
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Replace the root element, returning the previous one
    pub fn set_root(&mut self, root: Element) -> Option<Element> {
        self.root.replace(root)
    }

    /// Take the root element out of the document
    pub fn into_root(self) -> Option<Element> {
        self.root
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Read and parse an XML document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| {
            IoError::new(Some(&format!("Failed to read file '{}'", path.display()))).with_source(e)
        })?;
        Self::parse(&content)
    }

    /// Serialize and write the document to a file
    pub fn save(&self, path: impl AsRef<Path>, config: &WriterConfig) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string(config)?;
        fs::write(path, xml).map_err(|e| {
            IoError::new(Some(&format!("Failed to write file '{}'", path.display()))).with_source(e)
        })?;
        Ok(())
    }

    /// Parse an XML document from bytes with default limits
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_input_size(xml.len())?;
        tracing::debug!(size = xml.len(), "parsing XML document");

        // Text is kept as written; whitespace-only nodes are skipped below
        let mut reader = Reader::from_reader(xml);

        let mut doc = Document::new();
        // Open elements with the namespace scope in effect inside each
        let mut element_stack: Vec<(Element, NamespaceContext)> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(decl)) => {
                    let version = decl
                        .version()
                        .map_err(|e| Error::Xml(format!("Invalid XML declaration: {}", e)))?;
                    doc.version = String::from_utf8_lossy(&version).into_owned();
                    doc.encoding = match decl.encoding() {
                        Some(Ok(enc)) => Some(String::from_utf8_lossy(&enc).into_owned()),
                        Some(Err(e)) => {
                            return Err(Error::Xml(format!("Invalid XML declaration: {}", e)))
                        }
                        None => None,
                    };
                }
                Ok(Event::Start(e)) => {
                    let depth = element_stack.len() + 1;
                    let scope = element_stack
                        .last()
                        .map(|(_, scope)| scope.clone())
                        .unwrap_or_default();
                    let opened = Self::parse_element(&e, scope, depth, limits)?;
                    element_stack.push(opened);
                }
                Ok(Event::End(_)) => {
                    if let Some((current, _)) = element_stack.pop() {
                        Self::attach(&mut doc, &mut element_stack, current)?;
                    }
                }
                Ok(Event::Empty(e)) => {
                    let depth = element_stack.len() + 1;
                    let scope = element_stack
                        .last()
                        .map(|(_, scope)| scope.clone())
                        .unwrap_or_default();
                    let (element, _) = Self::parse_element(&e, scope, depth, limits)?;
                    Self::attach(&mut doc, &mut element_stack, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some((current, _)) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        if !text.trim().is_empty() {
                            current.append_text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some((current, _)) = element_stack.last_mut() {
                        let text = std::str::from_utf8(&e)
                            .map_err(|e| Error::Xml(format!("Invalid CDATA section: {}", e)))?;
                        current.append_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Comments, processing instructions, doctype
            }
            buf.clear();
        }

        if let Some((open, _)) = element_stack.last() {
            return Err(Error::Xml(format!(
                "Unexpected end of input: element '{}' is not closed",
                open.tag_name()
            )));
        }
        if doc.root.is_none() {
            return Err(Error::Xml("Document has no root element".to_string()));
        }

        tracing::debug!(version = %doc.version, "parsed XML document");
        Ok(doc)
    }

    fn attach(
        doc: &mut Document,
        element_stack: &mut [(Element, NamespaceContext)],
        element: Element,
    ) -> Result<()> {
        match element_stack.last_mut() {
            Some((parent, _)) => parent.append_child(element),
            None if doc.root.is_some() => {
                return Err(Error::Xml(format!(
                    "Multiple root elements: '{}'",
                    element.tag_name()
                )))
            }
            None => doc.root = Some(element),
        }
        Ok(())
    }

    /// Build an element from a start tag, resolving names in `scope`
    ///
    /// Returns the element and the scope in effect inside it.
    fn parse_element(
        start: &BytesStart,
        mut scope: NamespaceContext,
        depth: usize,
        limits: &Limits,
    ) -> Result<(Element, NamespaceContext)> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut declared = NamespaceContext::new();
        let mut raw_attributes: Vec<(String, String)> = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .into_owned();

            if attr_name == XMLNS_PREFIX {
                declared.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                if prefix == XMLNS_PREFIX || (prefix == XML_PREFIX && attr_value != XML_NAMESPACE) {
                    return Err(Error::Namespace(format!(
                        "Illegal declaration of reserved prefix '{}'",
                        prefix
                    )));
                }
                declared.add_prefix(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        limits.check_element(&name, depth, raw_attributes.len(), declared.len())?;
        scope.extend(&declared);

        validate_qname(&name)?;
        let (prefix, _) = split_qname(&name);
        let mut element = Element::new(scope.resolve(&name)?)
            .with_prefix(prefix)
            .with_namespaces(declared);

        for (attr_name, attr_value) in raw_attributes {
            validate_qname(&attr_name)?;
            let qname = scope.resolve_attribute(&attr_name)?;
            let (prefix, local) = split_qname(&attr_name);
            element.insert_parsed_attribute(Attr::new(
                qname.namespace(),
                prefix,
                local,
                attr_value,
            ))?;
        }

        Ok((element, scope))
    }

    /// Serialize the document
    pub fn to_xml_string(&self, config: &WriterConfig) -> Result<String> {
        writer::document_to_string(self, config)
    }
}

impl Element {
    /// Serialize this element and its subtree, without an XML declaration
    pub fn to_xml_string(&self, config: &WriterConfig) -> Result<String> {
        writer::element_to_string(self, config)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

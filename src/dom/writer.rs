//! XML serialization for DOM trees
//!
//! Elements are written with quick-xml. Namespace declarations recorded on
//! an element are always written; any binding an element or attribute name
//! needs that is not yet in scope is declared on the fly. A prefixed name
//! with no namespace cannot be written and fails with [`Error::Namespace`].

use super::{Attr, Document, Element};
use crate::error::{Error, Result};
use crate::names::join_qname;
use crate::namespaces::{NamespaceContext, XML_NAMESPACE, XML_PREFIX, XMLNS_PREFIX};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};

/// Serialization options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Spaces per indentation level, `None` for compact output; indenting
    /// adds whitespace to the text of elements that also have children
    indent: Option<usize>,
    /// Whether documents start with an XML declaration
    xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: None,
            xml_declaration: true,
        }
    }
}

impl WriterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the indentation
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Check if the XML declaration is written
    pub fn xml_declaration(&self) -> bool {
        self.xml_declaration
    }

    /// Set indentation
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether to write the XML declaration
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }
}

pub(crate) fn document_to_string(doc: &Document, config: &WriterConfig) -> Result<String> {
    let root = doc
        .root()
        .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;

    let mut writer = new_writer(config);
    if config.xml_declaration() {
        writer
            .write_event(Event::Decl(BytesDecl::new(
                doc.version(),
                doc.encoding(),
                None,
            )))
            .map_err(write_error)?;
    }
    write_element(&mut writer, root, &NamespaceContext::new())?;
    into_string(writer)
}

pub(crate) fn element_to_string(element: &Element, config: &WriterConfig) -> Result<String> {
    let mut writer = new_writer(config);
    write_element(&mut writer, element, &NamespaceContext::new())?;
    into_string(writer)
}

fn new_writer(config: &WriterConfig) -> Writer<Cursor<Vec<u8>>> {
    match config.indent() {
        Some(size) => Writer::new_with_indent(Cursor::new(Vec::new()), b' ', size),
        None => Writer::new(Cursor::new(Vec::new())),
    }
}

fn into_string(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::Xml(format!("serialized XML is not UTF-8: {}", e)))
}

fn write_error(e: quick_xml::Error) -> Error {
    Error::Xml(format!("Failed to write XML: {}", e))
}

/// Declarations written on one element: (prefix, uri), "" for the default
type Declarations = Vec<(String, String)>;

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    parent_scope: &NamespaceContext,
) -> Result<()> {
    let mut scope = parent_scope.clone();
    let mut decls: Declarations = Vec::new();

    for (prefix, uri) in element.namespaces().prefixes() {
        bind(&mut scope, &mut decls, prefix, uri);
    }
    if let Some(default) = element.namespaces().default_declaration() {
        bind(&mut scope, &mut decls, "", default);
    }

    bind_element_name(&mut scope, &mut decls, element)?;

    // Prefixes already written in this start tag keep their binding
    let mut used: Vec<String> = element.prefix().map(str::to_string).into_iter().collect();
    let mut attributes = Vec::with_capacity(element.attribute_count());
    for attr in element.attributes() {
        let name = attribute_name(&mut scope, &mut decls, &mut used, attr)?;
        attributes.push((name, attr.value().to_string()));
    }

    let tag = element.tag_name();
    let mut start = BytesStart::new(tag.as_str());
    for (prefix, uri) in &decls {
        let name = if prefix.is_empty() {
            XMLNS_PREFIX.to_string()
        } else {
            format!("{}:{}", XMLNS_PREFIX, prefix)
        };
        start.push_attribute((name.as_str(), uri.as_str()));
    }
    for (name, value) in &attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let text = element.text().filter(|t| !t.is_empty());
    if text.is_none() && element.children().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in element.children() {
        write_element(writer, child, &scope)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag.as_str())))
        .map_err(write_error)
}

fn bind(scope: &mut NamespaceContext, decls: &mut Declarations, prefix: &str, uri: &str) {
    if let Some(existing) = decls.iter_mut().find(|(p, _)| p == prefix) {
        existing.1 = uri.to_string();
    } else {
        decls.push((prefix.to_string(), uri.to_string()));
    }
    if prefix.is_empty() {
        scope.set_default_namespace(uri);
    } else {
        scope.add_prefix(prefix, uri);
    }
}

fn declared_here(decls: &Declarations, prefix: &str) -> bool {
    decls.iter().any(|(p, _)| p == prefix)
}

fn unbound_prefix(name: &str) -> Error {
    Error::Namespace(format!("cannot write '{}': its prefix has no namespace", name))
}

fn conflicting_declaration(element: &Element) -> Error {
    Error::Namespace(format!(
        "element '{}' declares its own prefix for another namespace",
        element.tag_name()
    ))
}

fn bind_element_name(
    scope: &mut NamespaceContext,
    decls: &mut Declarations,
    element: &Element,
) -> Result<()> {
    match (element.prefix(), element.namespace()) {
        (Some(_), None) => return Err(unbound_prefix(&element.tag_name())),
        (Some(XML_PREFIX), Some(_)) => {}
        (Some(prefix), Some(ns)) => {
            if scope.get_namespace(prefix) != Some(ns) {
                if declared_here(decls, prefix) {
                    return Err(conflicting_declaration(element));
                }
                bind(scope, decls, prefix, ns);
            }
        }
        (None, Some(ns)) => {
            if scope.get_default_namespace() != Some(ns) {
                if declared_here(decls, "") {
                    return Err(conflicting_declaration(element));
                }
                bind(scope, decls, "", ns);
            }
        }
        (None, None) => {
            if scope.get_default_namespace().is_some() {
                if declared_here(decls, "") {
                    return Err(conflicting_declaration(element));
                }
                bind(scope, decls, "", "");
            }
        }
    }
    Ok(())
}

fn attribute_name(
    scope: &mut NamespaceContext,
    decls: &mut Declarations,
    used: &mut Vec<String>,
    attr: &Attr,
) -> Result<String> {
    let ns = match (attr.namespace_uri(), attr.prefix()) {
        (Some(ns), _) => ns,
        (None, None) => return Ok(attr.local_name().to_string()),
        (None, Some(_)) => return Err(unbound_prefix(&attr.name())),
    };
    if ns == XML_NAMESPACE {
        return Ok(join_qname(Some(XML_PREFIX), attr.local_name()));
    }

    let prefix = match attr.prefix() {
        Some(p) if scope.get_namespace(p) == Some(ns) => p.to_string(),
        Some(p)
            if p != XML_PREFIX
                && p != XMLNS_PREFIX
                && !declared_here(decls, p)
                && !used.iter().any(|u| u == p) =>
        {
            bind(scope, decls, p, ns);
            p.to_string()
        }
        _ => match scope.lookup_prefix(ns) {
            Some(p) => p.to_string(),
            None => {
                let p = fresh_prefix(scope);
                bind(scope, decls, &p, ns);
                p
            }
        },
    };
    let name = join_qname(Some(&prefix), attr.local_name());
    used.push(prefix);
    Ok(name)
}

fn fresh_prefix(scope: &NamespaceContext) -> String {
    (0..)
        .map(|n| format!("ns{}", n))
        .find(|p| scope.get_namespace(p).is_none())
        .unwrap_or_else(|| "ns".to_string())
}

//! Arbitrary namespaced attributes
//!
//! [`XmlAttribute`] is an immutable value holding a namespace URI, a
//! namespace prefix, a local name and a value. It converts to and from a
//! DOM attribute node ([`Attr`]) and a plain mapping with the keys
//! `namespaceURI`, `namespacePrefix`, `attrName` and `attrValue`.

use crate::assert;
use crate::dom::{Attr, Document, Element};
use crate::error::{Error, Result};
use crate::names::join_qname;
use crate::namespaces::XMLNS_PREFIX;
use crate::traits::{MapSerializable, XmlSerializable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Mapping key for the namespace URI
pub const KEY_NAMESPACE_URI: &str = "namespaceURI";
/// Mapping key for the namespace prefix
pub const KEY_NAMESPACE_PREFIX: &str = "namespacePrefix";
/// Mapping key for the local attribute name
pub const KEY_ATTR_NAME: &str = "attrName";
/// Mapping key for the attribute value
pub const KEY_ATTR_VALUE: &str = "attrValue";

/// Element used to mint attribute nodes in [`XmlAttribute::to_dom_node`]
pub const PLACEHOLDER_ELEMENT: &str = "placeholder";

/// An arbitrary namespaced attribute
///
/// Construction validates that the namespace URI is absent or non-empty,
/// that the prefix is non-empty and not `xmlns`, and that the name and
/// value are non-empty. There is no way to obtain an instance that breaks
/// these rules, and no way to change one afterwards.
///
/// ```
/// use xml_common::XmlAttribute;
///
/// let attr = XmlAttribute::new(Some("urn:example"), "ex", "role", "admin")?;
/// assert_eq!(attr.qualified_name(), "ex:role");
///
/// let node = attr.to_dom_node()?;
/// assert_eq!(node.namespace_uri(), Some("urn:example"));
/// assert_eq!(XmlAttribute::from_dom_node(&node)?, attr);
/// # Ok::<(), xml_common::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Map<String, JsonValue>")]
pub struct XmlAttribute {
    #[serde(rename = "namespaceURI")]
    namespace_uri: Option<String>,
    #[serde(rename = "namespacePrefix")]
    namespace_prefix: String,
    #[serde(rename = "attrName")]
    attr_name: String,
    #[serde(rename = "attrValue")]
    attr_value: String,
}

impl XmlAttribute {
    /// Create a namespaced attribute
    pub fn new(
        namespace_uri: Option<&str>,
        namespace_prefix: &str,
        attr_name: &str,
        attr_value: &str,
    ) -> Result<Self> {
        assert::null_or_string_not_empty(namespace_uri, KEY_NAMESPACE_URI)?;
        assert::string_not_empty(namespace_prefix, KEY_NAMESPACE_PREFIX)?;
        assert::not_same(namespace_prefix, XMLNS_PREFIX, KEY_NAMESPACE_PREFIX)?;
        assert::string_not_empty(attr_name, KEY_ATTR_NAME)?;
        assert::string_not_empty(attr_value, KEY_ATTR_VALUE)?;

        Ok(Self {
            namespace_uri: namespace_uri.map(str::to_string),
            namespace_prefix: namespace_prefix.to_string(),
            attr_name: attr_name.to_string(),
            attr_value: attr_value.to_string(),
        })
    }

    /// Namespace URI, `None` for no namespace
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Namespace prefix
    pub fn namespace_prefix(&self) -> &str {
        &self.namespace_prefix
    }

    /// Local attribute name
    pub fn attr_name(&self) -> &str {
        &self.attr_name
    }

    /// Attribute value
    pub fn attr_value(&self) -> &str {
        &self.attr_value
    }

    /// `prefix:attrName`
    pub fn qualified_name(&self) -> String {
        join_qname(Some(&self.namespace_prefix), &self.attr_name)
    }

    /// Create an attribute from a DOM attribute node
    ///
    /// A node without a prefix is rejected, as is one using `xmlns`.
    pub fn from_dom_node(attr: &Attr) -> Result<Self> {
        Self::new(
            attr.namespace_uri(),
            attr.prefix().unwrap_or_default(),
            attr.local_name(),
            attr.value(),
        )
    }

    /// Create a DOM attribute node from this attribute
    ///
    /// The node is minted on a placeholder element of a throwaway document
    /// and returned detached. It carries the four fields exactly as they
    /// are, so every attribute has a node and
    /// [`from_dom_node`](Self::from_dom_node) gives the attribute back.
    /// Names are not checked against the XML name rules here; use
    /// [`apply_to`](Self::apply_to) for an element that will be serialized.
    pub fn to_dom_node(&self) -> Result<Attr> {
        let doc = Document::new();
        let mut placeholder = doc.create_element(PLACEHOLDER_ELEMENT)?;
        placeholder.set_attribute_node(Attr::new(
            self.namespace_uri(),
            Some(self.namespace_prefix.as_str()),
            self.attr_name.as_str(),
            self.attr_value.as_str(),
        ));

        tracing::trace!(attribute = %self.qualified_name(), "minted attribute node");
        placeholder
            .get_attribute_node_ns(self.namespace_uri(), &self.attr_name)
            .cloned()
            .ok_or_else(|| {
                Error::Namespace(format!(
                    "attribute '{}' was not set on the placeholder element",
                    self.qualified_name()
                ))
            })
    }

    /// Set this attribute on an existing element
    ///
    /// Goes through [`Element::set_attribute_ns`], so the prefix and name
    /// must form a QName and the `xml` prefix needs the XML namespace.
    pub fn apply_to(&self, element: &mut Element) -> Result<()> {
        element.set_attribute_ns(
            self.namespace_uri(),
            &self.qualified_name(),
            &self.attr_value,
        )
    }

    /// Create an attribute from a mapping
    ///
    /// All four keys must be present and hold strings; `namespaceURI` may
    /// also be `null` for no namespace.
    pub fn from_map(data: &Map<String, JsonValue>) -> Result<Self> {
        Self::read_map(data).map_err(|e| {
            tracing::debug!(error = %e, "rejected attribute mapping");
            e
        })
    }

    fn read_map(data: &Map<String, JsonValue>) -> Result<Self> {
        for key in [
            KEY_NAMESPACE_URI,
            KEY_NAMESPACE_PREFIX,
            KEY_ATTR_NAME,
            KEY_ATTR_VALUE,
        ] {
            assert::key_exists(data, key)?;
        }

        let namespace_uri = assert::nullable_string_entry(data, KEY_NAMESPACE_URI)?;
        let namespace_prefix = assert::string_entry(data, KEY_NAMESPACE_PREFIX)?;
        let attr_name = assert::string_entry(data, KEY_ATTR_NAME)?;
        let attr_value = assert::string_entry(data, KEY_ATTR_VALUE)?;

        Self::new(namespace_uri, namespace_prefix, attr_name, attr_value)
    }

    /// Create a mapping from this attribute; no namespace maps to `null`
    pub fn to_map(&self) -> Map<String, JsonValue> {
        let mut data = Map::new();
        data.insert(
            KEY_NAMESPACE_URI.to_string(),
            self.namespace_uri
                .clone()
                .map_or(JsonValue::Null, JsonValue::String),
        );
        data.insert(
            KEY_NAMESPACE_PREFIX.to_string(),
            JsonValue::String(self.namespace_prefix.clone()),
        );
        data.insert(
            KEY_ATTR_NAME.to_string(),
            JsonValue::String(self.attr_name.clone()),
        );
        data.insert(
            KEY_ATTR_VALUE.to_string(),
            JsonValue::String(self.attr_value.clone()),
        );
        data
    }
}

impl TryFrom<Map<String, JsonValue>> for XmlAttribute {
    type Error = Error;

    fn try_from(data: Map<String, JsonValue>) -> Result<Self> {
        Self::from_map(&data)
    }
}

impl TryFrom<&Attr> for XmlAttribute {
    type Error = Error;

    fn try_from(attr: &Attr) -> Result<Self> {
        Self::from_dom_node(attr)
    }
}

impl MapSerializable for XmlAttribute {
    fn from_map(data: &Map<String, JsonValue>) -> Result<Self> {
        XmlAttribute::from_map(data)
    }

    fn to_map(&self) -> Map<String, JsonValue> {
        XmlAttribute::to_map(self)
    }
}

impl XmlSerializable for XmlAttribute {
    type Node = Attr;

    fn from_xml(node: &Attr) -> Result<Self> {
        Self::from_dom_node(node)
    }

    fn to_xml(&self) -> Result<Attr> {
        self.to_dom_node()
    }
}

/// Renders as `prefix:attrName="value"`
impl fmt::Display for XmlAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}=\"{}\"",
            self.qualified_name(),
            quick_xml::escape::escape(self.attr_value.as_str())
        )
    }
}

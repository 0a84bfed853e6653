//! Elements with base64-encoded content
//!
//! A [`Base64Element`] is an element whose only content is base64 text.
//! The element's name is fixed by a marker type implementing
//! [`ElementName`], so each kind of base64 element is its own Rust type:
//!
//! ```
//! use xml_common::{Base64Element, ElementName};
//!
//! struct DigestValue;
//!
//! impl ElementName for DigestValue {
//!     const NS: Option<&'static str> = Some("http://www.w3.org/2000/09/xmldsig#");
//!     const NS_PREFIX: Option<&'static str> = Some("ds");
//!     const LOCAL_NAME: &'static str = "DigestValue";
//! }
//!
//! let digest = Base64Element::<DigestValue>::from_bytes(b"digest")?;
//! let element = digest.to_xml()?;
//! assert_eq!(element.tag_name(), "ds:DigestValue");
//! assert_eq!(Base64Element::<DigestValue>::from_xml(&element)?.decode()?, b"digest");
//! # Ok::<(), xml_common::Error>(())
//! ```

use crate::assert;
use crate::dom::{Document, Element};
use crate::error::{Error, Result};
use crate::names::join_qname;
use crate::namespaces::QName;
use crate::traits::XmlSerializable;
use base64::Engine;
use std::fmt;
use std::marker::PhantomData;

/// Fixed name of an element type
pub trait ElementName {
    /// Namespace URI, `None` for no namespace
    const NS: Option<&'static str>;
    /// Prefix used when writing the element
    const NS_PREFIX: Option<&'static str>;
    /// Local name
    const LOCAL_NAME: &'static str;

    /// Expanded name
    fn qname() -> QName {
        QName::new(Self::NS, Self::LOCAL_NAME)
    }

    /// Qualified name as written
    fn qualified_name() -> String {
        join_qname(Self::NS_PREFIX, Self::LOCAL_NAME)
    }
}

/// An element holding base64 content
pub struct Base64Element<K> {
    content: String,
    kind: PhantomData<fn() -> K>,
}

impl<K: ElementName> Base64Element<K> {
    /// Create an element from base64 text
    ///
    /// Whitespace is stripped before the content is checked, so wrapped
    /// base64 (as found in signed documents) is accepted.
    pub fn new(content: &str) -> Result<Self> {
        assert::string_not_empty(content, "base64 content")?;
        let sanitized: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        assert::string_not_empty(&sanitized, "base64 content")?;
        assert::valid_base64(&sanitized, "base64 content")?;

        Ok(Self {
            content: sanitized,
            kind: PhantomData,
        })
    }

    /// Create an element by encoding raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid_argument("cannot encode empty content"));
        }
        Self::new(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// The sanitized base64 content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Decode the content
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.content)
            .map_err(|e| Error::invalid_argument(format!("invalid base64 content: {}", e)))
    }

    /// Expanded name of this element type
    pub fn qname() -> QName {
        K::qname()
    }

    /// Create an element from its DOM representation
    pub fn from_xml(element: &Element) -> Result<Self> {
        if element.local_name() != K::LOCAL_NAME {
            return Err(Error::InvalidDomElement(format!(
                "expected element '{}', found '{}'",
                K::LOCAL_NAME,
                element.local_name()
            )));
        }
        if element.namespace() != K::NS {
            return Err(Error::InvalidDomElement(format!(
                "expected namespace '{}' for element '{}', found '{}'",
                K::NS.unwrap_or_default(),
                K::LOCAL_NAME,
                element.namespace().unwrap_or_default()
            )));
        }

        Self::new(&element.text_content())
    }

    /// Create the DOM representation of this element
    pub fn to_xml(&self) -> Result<Element> {
        let doc = Document::new();
        let mut element = doc.create_element_ns(K::NS, &K::qualified_name())?;
        element.set_text(self.content.clone());
        Ok(element)
    }

    /// Append the DOM representation of this element to a parent
    pub fn append_to(&self, parent: &mut Element) -> Result<()> {
        parent.append_child(self.to_xml()?);
        Ok(())
    }
}

impl<K: ElementName> XmlSerializable for Base64Element<K> {
    type Node = Element;

    fn from_xml(node: &Element) -> Result<Self> {
        Base64Element::from_xml(node)
    }

    fn to_xml(&self) -> Result<Element> {
        Base64Element::to_xml(self)
    }
}

impl<K> Clone for Base64Element<K> {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Base64Element<K> {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl<K> Eq for Base64Element<K> {}

impl<K: ElementName> fmt::Debug for Base64Element<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Base64Element")
            .field("name", &K::qualified_name())
            .field("content", &self.content)
            .finish()
    }
}

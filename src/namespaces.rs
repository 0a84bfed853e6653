//! XML namespace handling
//!
//! Qualified names, namespace prefix mappings, and the reserved prefixes
//! and namespaces from the XML Namespaces recommendation.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// XML namespace, bound to the `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace, used by namespace declaration attributes
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The prefix permanently bound to [`XML_NAMESPACE`]
pub const XML_PREFIX: &str = "xml";

/// The reserved token used to declare namespaces
pub const XMLNS_PREFIX: &str = "xmlns";

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Get the namespace URI
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check whether this name matches a namespace and local name
    pub fn matches(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }
}

/// Clark notation: `{namespace}local`
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI, in declaration order
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix); `Some("")` undeclares it
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    ///
    /// The `xml` prefix is always bound.
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == XML_PREFIX {
            return Some(XML_NAMESPACE);
        }
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace, treating an undeclaration as absent
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Raw default namespace declaration, including `Some("")`
    pub fn default_declaration(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Find a prefix bound to a namespace
    pub fn lookup_prefix(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .rev()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Iterate prefixed declarations in declaration order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Number of declarations, counting a default declaration
    pub fn len(&self) -> usize {
        self.prefixes.len() + usize::from(self.default_namespace.is_some())
    }

    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overlay the declarations of `inner` onto this scope
    pub fn extend(&mut self, inner: &NamespaceContext) {
        for (prefix, uri) in &inner.prefixes {
            self.prefixes.insert(prefix.clone(), uri.clone());
        }
        if let Some(ref default) = inner.default_namespace {
            self.default_namespace = Some(default.clone());
        }
    }

    /// Resolve a prefixed element name to a QName
    ///
    /// Unprefixed names take the default namespace.
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            let namespace = self
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName::new(self.get_default_namespace(), prefixed_name))
        }
    }

    /// Resolve a prefixed attribute name to a QName
    ///
    /// Unprefixed attributes are in no namespace.
    pub fn resolve_attribute(&self, prefixed_name: &str) -> Result<QName> {
        if prefixed_name.contains(':') {
            self.resolve(prefixed_name)
        } else {
            Ok(QName::local(prefixed_name))
        }
    }
}

//! Element and attribute nodes

use crate::error::{Error, Result};
use crate::names::{join_qname, split_qname, validate_name, validate_qname};
use crate::namespaces::{
    NamespaceContext, QName, XMLNS_NAMESPACE, XMLNS_PREFIX, XML_NAMESPACE, XML_PREFIX,
};
use indexmap::IndexMap;

/// A namespaced attribute node
///
/// Attribute nodes are detached values: reading the namespace URI, prefix,
/// local name and value is all they offer. They are minted by
/// [`Element::set_attribute_ns`] and read back with
/// [`Element::get_attribute_node`] or [`Element::get_attribute_node_ns`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attr {
    namespace_uri: Option<String>,
    prefix: Option<String>,
    local_name: String,
    value: String,
}

impl Attr {
    /// Create an attribute node from its parts, without any checks
    pub fn new(
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace_uri: namespace_uri.map(str::to_string),
            prefix: prefix.map(str::to_string),
            local_name: local_name.into(),
            value: value.into(),
        }
    }

    /// Namespace URI, if any
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Local (unqualified) name
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Attribute value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Qualified name as written, `prefix:local` or `local`
    pub fn name(&self) -> String {
        join_qname(self.prefix(), &self.local_name)
    }

    /// Expanded name
    pub fn qname(&self) -> QName {
        QName::new(self.namespace_uri(), self.local_name.clone())
    }
}

/// XML element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    qname: QName,
    prefix: Option<String>,
    attributes: IndexMap<QName, Attr>,
    namespaces: NamespaceContext,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create a new unprefixed element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            prefix: None,
            attributes: IndexMap::new(),
            namespaces: NamespaceContext::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(str::to_string);
        self
    }

    pub(crate) fn with_namespaces(mut self, namespaces: NamespaceContext) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace()
    }

    /// Get the prefix of the element
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Get the expanded name of the element
    pub fn qname(&self) -> &QName {
        &self.qname
    }

    /// Qualified tag name as written
    pub fn tag_name(&self) -> String {
        join_qname(self.prefix(), self.local_name())
    }

    /// Set an attribute that is in no namespace
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        let attr = Attr::new(None, None, name, value);
        self.attributes.insert(attr.qname(), attr);
        Ok(())
    }

    /// Set a namespaced attribute
    ///
    /// An empty namespace is treated as none. Namespace declarations
    /// (`xmlns` or `xmlns:*` in the XMLNS namespace) are recorded as
    /// declarations on this element instead of attribute nodes. Setting an
    /// attribute whose expanded name already exists replaces its value and
    /// prefix in place.
    pub fn set_attribute_ns(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> Result<()> {
        validate_qname(qualified_name)?;
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let (prefix, local) = split_qname(qualified_name);

        if prefix == Some(XML_PREFIX) && namespace != Some(XML_NAMESPACE) {
            return Err(Error::Namespace(format!(
                "prefix 'xml' cannot be bound to '{}'",
                namespace.unwrap_or_default()
            )));
        }

        let is_declaration =
            prefix == Some(XMLNS_PREFIX) || (prefix.is_none() && local == XMLNS_PREFIX);
        if is_declaration != (namespace == Some(XMLNS_NAMESPACE)) {
            return Err(Error::Namespace(format!(
                "'{}' and the XMLNS namespace must be used together",
                qualified_name
            )));
        }
        if is_declaration {
            return match prefix {
                Some(_) => self.declare_namespace(Some(local), value),
                None => self.declare_namespace(None, value),
            };
        }

        let attr = Attr::new(namespace, prefix, local, value);
        self.attributes.insert(attr.qname(), attr);
        Ok(())
    }

    /// Store an attribute node as given, replacing one with the same
    /// expanded name
    pub(crate) fn set_attribute_node(&mut self, attr: Attr) -> Option<Attr> {
        self.attributes.insert(attr.qname(), attr)
    }

    pub(crate) fn insert_parsed_attribute(&mut self, attr: Attr) -> Result<()> {
        let qname = attr.qname();
        if self.attributes.contains_key(&qname) {
            return Err(Error::Xml(format!(
                "duplicate attribute '{}' on element '{}'",
                qname,
                self.tag_name()
            )));
        }
        self.attributes.insert(qname, attr);
        Ok(())
    }

    /// Get an attribute value by qualified name
    pub fn get_attribute(&self, qualified_name: &str) -> Option<&str> {
        self.get_attribute_node(qualified_name).map(Attr::value)
    }

    /// Get an attribute value by namespace and local name
    pub fn get_attribute_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.get_attribute_node_ns(namespace, local_name)
            .map(Attr::value)
    }

    /// Get an attribute node by qualified name
    pub fn get_attribute_node(&self, qualified_name: &str) -> Option<&Attr> {
        let (prefix, local) = split_qname(qualified_name);
        self.attributes
            .values()
            .find(|attr| attr.prefix() == prefix && attr.local_name() == local)
    }

    /// Get an attribute node by namespace and local name
    pub fn get_attribute_node_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&Attr> {
        self.attributes
            .get(&QName::new(namespace.filter(|ns| !ns.is_empty()), local_name))
    }

    /// Check for an attribute by namespace and local name
    pub fn has_attribute_ns(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.get_attribute_node_ns(namespace, local_name).is_some()
    }

    /// Remove an attribute by namespace and local name, returning it
    pub fn remove_attribute_ns(&mut self, namespace: Option<&str>, local_name: &str) -> Option<Attr> {
        self.attributes
            .shift_remove(&QName::new(namespace.filter(|ns| !ns.is_empty()), local_name))
    }

    /// Attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.values()
    }

    /// Number of attributes, not counting namespace declarations
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Declare a namespace on this element
    ///
    /// `None` declares the default namespace.
    pub fn declare_namespace(&mut self, prefix: Option<&str>, namespace: &str) -> Result<()> {
        match prefix {
            Some(XMLNS_PREFIX) => Err(Error::Namespace(
                "the 'xmlns' prefix cannot be declared".to_string(),
            )),
            Some(XML_PREFIX) if namespace != XML_NAMESPACE => Err(Error::Namespace(format!(
                "prefix 'xml' cannot be bound to '{}'",
                namespace
            ))),
            Some(XML_PREFIX) => Ok(()),
            Some(p) => {
                crate::names::validate_ncname(p)?;
                if namespace.is_empty() {
                    return Err(Error::Namespace(format!(
                        "prefix '{}' cannot be bound to an empty namespace",
                        p
                    )));
                }
                self.namespaces.add_prefix(p, namespace);
                Ok(())
            }
            None => {
                self.namespaces.set_default_namespace(namespace);
                Ok(())
            }
        }
    }

    /// Namespace declarations made on this element
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Get the element's own text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the element's own text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Own text followed by the text of all descendants
    pub fn text_content(&self) -> String {
        let mut content = self.text.clone().unwrap_or_default();
        for child in &self.children {
            content.push_str(&child.text_content());
        }
        content
    }

    /// Add a child element
    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Child elements
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Find the first child with the given expanded name
    pub fn find_child_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|e| e.qname.matches(namespace, local_name))
    }
}

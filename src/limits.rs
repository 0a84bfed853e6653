//! Limits for XML document parsing
//!
//! Bounds on input size and on the shape of each element, checked by
//! [`Document::parse_with_limits`](crate::Document::parse_with_limits) as
//! the document is read.

use crate::error::{Error, Result};

/// Parser limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth, the root being at depth 1
    pub max_depth: usize,

    /// Maximum input size in bytes
    pub max_input_size: usize,

    /// Maximum attributes on one start tag, declarations excluded
    pub max_attributes_per_element: usize,

    /// Maximum `xmlns` declarations on one start tag
    pub max_declarations_per_element: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_input_size: 100 * 1024 * 1024, // 100 MB
            max_attributes_per_element: 1000,
            max_declarations_per_element: 1000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter bounds for documents from untrusted sources
    pub fn strict() -> Self {
        Self {
            max_depth: 100,
            max_input_size: 10 * 1024 * 1024, // 10 MB
            max_attributes_per_element: 100,
            max_declarations_per_element: 100,
        }
    }

    /// Set the maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set the maximum attributes per element
    pub fn with_max_attributes_per_element(mut self, count: usize) -> Self {
        self.max_attributes_per_element = count;
        self
    }

    /// Set the maximum namespace declarations per element
    pub fn with_max_declarations_per_element(mut self, count: usize) -> Self {
        self.max_declarations_per_element = count;
        self
    }

    /// Check the size of the whole input before reading starts
    pub fn check_input_size(&self, size: usize) -> Result<()> {
        if size > self.max_input_size {
            return Err(Error::LimitExceeded(format!(
                "input of {} bytes is larger than the {} byte limit",
                size, self.max_input_size
            )));
        }
        Ok(())
    }

    /// Check one start tag
    ///
    /// `name` is the tag as written and is only used in the error message.
    pub fn check_element(
        &self,
        name: &str,
        depth: usize,
        attributes: usize,
        declarations: usize,
    ) -> Result<()> {
        let exceeded = |what: &str, found: usize, limit: usize| -> Result<()> {
            Err(Error::LimitExceeded(format!(
                "element '{}': {} {} exceeds the limit of {}",
                name, what, found, limit
            )))
        };
        if depth > self.max_depth {
            return exceeded("depth", depth, self.max_depth);
        }
        if attributes > self.max_attributes_per_element {
            return exceeded("attribute count", attributes, self.max_attributes_per_element);
        }
        if declarations > self.max_declarations_per_element {
            return exceeded(
                "namespace declaration count",
                declarations,
                self.max_declarations_per_element,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn limit_message(xml: &str, limits: &Limits) -> String {
        match Document::parse_with_limits(xml.as_bytes(), limits) {
            Err(Error::LimitExceeded(msg)) => msg,
            other => panic!("expected a limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_element() {
        let limits = Limits::new()
            .with_max_depth(2)
            .with_max_attributes_per_element(1)
            .with_max_declarations_per_element(0);

        assert!(limits.check_element("a", 2, 1, 0).is_ok());
        assert!(limits.check_element("a", 3, 0, 0).is_err());
        assert!(limits.check_element("a", 1, 2, 0).is_err());
        assert!(limits.check_element("a", 1, 0, 1).is_err());
    }

    #[test]
    fn test_depth_error_names_element() {
        let limits = Limits::new().with_max_depth(2);
        let msg = limit_message("<a><b><c/></b></a>", &limits);
        assert!(msg.contains("'c'"), "{}", msg);
        assert!(msg.contains("depth 3"), "{}", msg);

        assert!(Document::parse_with_limits(b"<a><b/></a>", &limits).is_ok());
    }

    #[test]
    fn test_attribute_count_excludes_declarations() {
        let xml = r#"<ex:root xmlns:ex="urn:example" ex:role="admin" id="1"/>"#;

        let limits = Limits::new().with_max_attributes_per_element(2);
        assert!(Document::parse_with_limits(xml.as_bytes(), &limits).is_ok());

        let limits = Limits::new().with_max_attributes_per_element(1);
        let msg = limit_message(xml, &limits);
        assert!(msg.contains("'ex:root'"), "{}", msg);
        assert!(msg.contains("attribute count 2"), "{}", msg);
    }

    #[test]
    fn test_declaration_count() {
        let xml = r#"<root xmlns="urn:a" xmlns:b="urn:b"/>"#;
        let limits = Limits::new().with_max_declarations_per_element(1);
        let msg = limit_message(xml, &limits);
        assert!(msg.contains("namespace declaration count 2"), "{}", msg);
    }

    #[test]
    fn test_input_size() {
        let xml = "<root/>";
        let limits = Limits::new().with_max_input_size(xml.len());
        assert!(Document::parse_with_limits(xml.as_bytes(), &limits).is_ok());

        let limits = Limits::new().with_max_input_size(xml.len() - 1);
        assert!(limit_message(xml, &limits).contains("byte limit"));
    }

    #[test]
    fn test_strict_is_tighter_than_default() {
        let strict = Limits::strict();
        let default = Limits::default();
        assert!(strict.max_depth < default.max_depth);
        assert!(strict.max_input_size < default.max_input_size);
    }
}

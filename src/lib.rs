//! # xml-common
//!
//! A small object model for namespaced XML attributes and base64-encoded
//! element content, with conversions between native values, DOM nodes and
//! plain key/value mappings.
//!
//! ## Features
//!
//! - [`XmlAttribute`]: validated, immutable namespaced attribute values
//! - [`Base64Element`]: elements whose content is base64 text
//! - A minimal namespace-aware DOM ([`dom`]) read and written with quick-xml
//! - Mapping conversion over `serde_json` objects, and serde support
//!
//! ## Example
//!
//! ```rust
//! use xml_common::XmlAttribute;
//!
//! let attr = XmlAttribute::new(Some("urn:example"), "ex", "role", "admin")?;
//!
//! let data = attr.to_map();
//! assert_eq!(data["attrValue"], "admin");
//! assert_eq!(XmlAttribute::from_map(&data)?, attr);
//! # Ok::<(), xml_common::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod assert;
pub mod error;
pub mod limits;

// Names and namespaces
pub mod names;
pub mod namespaces;

// DOM
pub mod dom;

// Object model
pub mod attribute;
pub mod base64_element;
pub mod traits;

// Re-exports for convenience
pub use attribute::XmlAttribute;
pub use base64_element::{Base64Element, ElementName};
pub use dom::{Attr, Document, Element, WriterConfig};
pub use error::{Error, IoError, Result};
pub use limits::Limits;
pub use namespaces::{QName, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use traits::{MapSerializable, XmlSerializable};

/// Version of the xml-common library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Conversion traits shared by the object model
//!
//! Objects in this crate convert to and from two outer representations: a
//! DOM node and a plain string-keyed mapping.

use crate::error::Result;
use serde_json::{Map, Value as JsonValue};

/// Conversion to and from a plain key/value mapping
pub trait MapSerializable: Sized {
    /// Build an object from a mapping, validating keys, value types and the
    /// object's own invariants
    fn from_map(data: &Map<String, JsonValue>) -> Result<Self>;

    /// Render the object as a mapping that [`MapSerializable::from_map`]
    /// accepts back
    fn to_map(&self) -> Map<String, JsonValue>;
}

/// Conversion to and from a DOM node
pub trait XmlSerializable: Sized {
    /// The DOM node type this object maps onto
    type Node;

    /// Build an object from a DOM node
    fn from_xml(node: &Self::Node) -> Result<Self>;

    /// Create a DOM node from this object
    fn to_xml(&self) -> Result<Self::Node>;
}

//! XML name checks
//!
//! Lexical validation for XML Names, NCNames and QNames, used by the DOM
//! when elements and attributes are created.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// NameStartChar and NameChar from XML 1.0 (fifth edition), minus ':'
const NC_NAME_START: &str = r"A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}";
const NC_NAME_EXTRA: &str = r"\-\.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}";

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{start}][{start}{extra}]*$",
        start = NC_NAME_START,
        extra = NC_NAME_EXTRA
    ))
    .unwrap()
});

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{start}:][{start}{extra}:]*$",
        start = NC_NAME_START,
        extra = NC_NAME_EXTRA
    ))
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Validate an XML Name and return an error if invalid
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid XML Name: '{}'", name)))
    }
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

/// Validate a QName and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid QName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Join a prefix and a local name into a qualified name
pub fn join_qname(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local_name),
        _ => local_name.to_string(),
    }
}

//! XmlAttribute integration tests
//!
//! Round-trip properties through the DOM and mapping forms, and the
//! construction rules, checked over generated inputs.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use xml_common::attribute::{
    KEY_ATTR_NAME, KEY_ATTR_VALUE, KEY_NAMESPACE_PREFIX, KEY_NAMESPACE_URI,
};
use xml_common::{Error, XmlAttribute};

// ============================================================================
// Strategies
// ============================================================================

fn namespace_uri() -> impl Strategy<Value = Option<String>> {
    prop::option::of("(urn|http):[a-z0-9/.:-]{1,24}")
}

/// NCNames other than the reserved `xmlns`
fn ncname() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_.-]{0,11}".prop_filter("reserved prefix", |s| s != "xmlns")
}

fn value() -> impl Strategy<Value = String> {
    "\\PC{1,24}"
}

fn any_non_empty() -> impl Strategy<Value = String> {
    ".{1,16}"
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn dom_round_trip(
        uri in prop::option::of(any_non_empty()),
        prefix in prop_oneof![
            Just("xml".to_string()),
            any_non_empty().prop_filter("reserved", |p| p != "xmlns"),
        ],
        name in any_non_empty(),
        val in any_non_empty(),
    ) {
        let attr = XmlAttribute::new(uri.as_deref(), &prefix, &name, &val).unwrap();
        let node = attr.to_dom_node().unwrap();
        let back = XmlAttribute::from_dom_node(&node).unwrap();
        prop_assert_eq!(back.namespace_uri(), uri.as_deref());
        prop_assert_eq!(back, attr);
    }

    #[test]
    fn map_round_trip(
        uri in prop::option::of(any_non_empty()),
        prefix in any_non_empty().prop_filter("reserved", |p| p != "xmlns"),
        name in any_non_empty(),
        val in any_non_empty(),
    ) {
        let attr = XmlAttribute::new(uri.as_deref(), &prefix, &name, &val).unwrap();
        let back = XmlAttribute::from_map(&attr.to_map()).unwrap();
        prop_assert_eq!(back.namespace_uri(), uri.as_deref());
        prop_assert_eq!(back, attr);
    }

    #[test]
    fn reserved_prefix_always_rejected(uri in namespace_uri(), name in any_non_empty(), val in any_non_empty()) {
        let result = XmlAttribute::new(uri.as_deref(), "xmlns", &name, &val);
        prop_assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_fields_always_rejected(uri in namespace_uri(), prefix in ncname(), name in ncname(), val in value()) {
        prop_assert!(XmlAttribute::new(Some(""), &prefix, &name, &val).is_err());
        prop_assert!(XmlAttribute::new(uri.as_deref(), "", &name, &val).is_err());
        prop_assert!(XmlAttribute::new(uri.as_deref(), &prefix, "", &val).is_err());
        prop_assert!(XmlAttribute::new(uri.as_deref(), &prefix, &name, "").is_err());
    }

    #[test]
    fn missing_key_always_rejected(uri in namespace_uri(), prefix in ncname(), name in ncname(), val in value(), index in 0usize..4) {
        let keys = [KEY_NAMESPACE_URI, KEY_NAMESPACE_PREFIX, KEY_ATTR_NAME, KEY_ATTR_VALUE];
        let mut data = XmlAttribute::new(uri.as_deref(), &prefix, &name, &val).unwrap().to_map();
        data.remove(keys[index]);
        let err = XmlAttribute::from_map(&data).unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_concrete_scenario() {
    let attr = XmlAttribute::new(Some("urn:example"), "ex", "role", "admin").unwrap();

    assert_eq!(attr.namespace_uri(), Some("urn:example"));
    assert_eq!(attr.namespace_prefix(), "ex");
    assert_eq!(attr.attr_name(), "role");
    assert_eq!(attr.attr_value(), "admin");

    assert_eq!(
        JsonValue::Object(attr.to_map()),
        json!({
            "namespaceURI": "urn:example",
            "namespacePrefix": "ex",
            "attrName": "role",
            "attrValue": "admin",
        })
    );

    let node = attr.to_dom_node().unwrap();
    assert_eq!(node.namespace_uri(), Some("urn:example"));
    assert_eq!(node.local_name(), "role");
    assert_eq!(node.value(), "admin");
}

#[test]
fn test_absent_namespace_survives_both_round_trips() {
    let attr = XmlAttribute::new(None, "ex", "role", "admin").unwrap();

    let via_map = XmlAttribute::from_map(&attr.to_map()).unwrap();
    assert_eq!(via_map.namespace_uri(), None);

    let via_dom = XmlAttribute::from_dom_node(&attr.to_dom_node().unwrap()).unwrap();
    assert_eq!(via_dom.namespace_uri(), None);

    let via_json: XmlAttribute =
        serde_json::from_str(&serde_json::to_string(&attr).unwrap()).unwrap();
    assert_eq!(via_json, attr);
}

#[test]
fn test_xml_prefix_round_trips_through_dom() {
    for uri in [None, Some("urn:x"), Some(xml_common::XML_NAMESPACE)] {
        let attr = XmlAttribute::new(uri, "xml", "lang", "en").unwrap();
        let node = attr.to_dom_node().unwrap();
        assert_eq!(node.namespace_uri(), uri);
        assert_eq!(XmlAttribute::from_dom_node(&node).unwrap(), attr);
    }

    let attr = XmlAttribute::new(Some("urn:x"), "ex", "a:b", "v").unwrap();
    assert_eq!(XmlAttribute::from_dom_node(&attr.to_dom_node().unwrap()).unwrap(), attr);
}

#[test]
fn test_from_json_text() {
    let attr: XmlAttribute = serde_json::from_str(
        r#"{"namespaceURI": "urn:example", "namespacePrefix": "ex", "attrName": "role", "attrValue": "admin"}"#,
    )
    .unwrap();
    assert_eq!(attr.qualified_name(), "ex:role");

    let missing = serde_json::from_str::<XmlAttribute>(
        r#"{"namespacePrefix": "ex", "attrName": "role", "attrValue": "admin"}"#,
    );
    assert!(missing.is_err());
}

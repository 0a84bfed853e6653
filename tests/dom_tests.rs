//! DOM integration tests
//!
//! Serializer output is re-read with roxmltree, an independent
//! namespace-aware parser, and with this crate's own reader.

use pretty_assertions::assert_eq;
use std::io::Write;
use xml_common::{
    Base64Element, Document, ElementName, Error, Limits, WriterConfig, XmlAttribute,
};

struct SignatureValue;

impl ElementName for SignatureValue {
    const NS: Option<&'static str> = Some("http://www.w3.org/2000/09/xmldsig#");
    const NS_PREFIX: Option<&'static str> = Some("ds");
    const LOCAL_NAME: &'static str = "SignatureValue";
}

fn sample_attributes() -> Vec<XmlAttribute> {
    vec![
        XmlAttribute::new(Some("urn:example"), "ex", "role", "admin").unwrap(),
        XmlAttribute::new(Some("urn:other"), "o", "level", "3 < 4").unwrap(),
    ]
}

fn sample_document() -> Document {
    let mut doc = Document::new();
    let mut root = doc
        .create_element_ns(Some("urn:oasis:names:tc:SAML:2.0:metadata"), "md:Extensions")
        .unwrap();
    for attr in sample_attributes() {
        attr.apply_to(&mut root).unwrap();
    }
    Base64Element::<SignatureValue>::from_bytes(b"signature bytes")
        .unwrap()
        .append_to(&mut root)
        .unwrap();
    doc.set_root(root);
    doc
}

#[test]
fn test_serialized_attributes_parse_with_roxmltree() {
    let xml = sample_document()
        .to_xml_string(&WriterConfig::default())
        .unwrap();

    let parsed = roxmltree::Document::parse(&xml).unwrap();
    let root = parsed.root_element();
    assert_eq!(
        root.tag_name().namespace(),
        Some("urn:oasis:names:tc:SAML:2.0:metadata")
    );
    assert_eq!(root.attribute(("urn:example", "role")), Some("admin"));
    assert_eq!(root.attribute(("urn:other", "level")), Some("3 < 4"));

    let signature = root.first_element_child().unwrap();
    assert_eq!(signature.tag_name().name(), "SignatureValue");
    assert_eq!(signature.text(), Some("c2lnbmF0dXJlIGJ5dGVz"));
}

#[test]
fn test_attributes_survive_write_and_read() {
    let xml = sample_document()
        .to_xml_string(&WriterConfig::new().with_indent(Some(2)))
        .unwrap();
    let doc = Document::from_string(&xml).unwrap();
    let root = doc.root().unwrap();

    let read_back: Vec<XmlAttribute> = root
        .attributes()
        .map(|node| XmlAttribute::from_dom_node(node).unwrap())
        .collect();
    assert_eq!(read_back, sample_attributes());

    let signature = root
        .find_child_ns(SignatureValue::NS, SignatureValue::LOCAL_NAME)
        .unwrap();
    let value = Base64Element::<SignatureValue>::from_xml(signature).unwrap();
    assert_eq!(value.decode().unwrap(), b"signature bytes");
}

#[test]
fn test_attribute_without_namespace_is_not_written() {
    let mut doc = Document::new();
    let mut root = doc.create_element("root").unwrap();
    XmlAttribute::new(None, "ex", "role", "admin")
        .unwrap()
        .apply_to(&mut root)
        .unwrap();
    doc.set_root(root);

    let err = doc.to_xml_string(&WriterConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Namespace(_)), "{:?}", err);
}

#[test]
fn test_inherited_prefix_survives_conflicting_attribute() {
    let mut doc = Document::new();
    let mut root = doc.create_element_ns(Some("urn:a"), "p:root").unwrap();
    let mut child = doc.create_element_ns(Some("urn:a"), "p:e").unwrap();
    XmlAttribute::new(Some("urn:b"), "p", "attr", "v")
        .unwrap()
        .apply_to(&mut child)
        .unwrap();
    root.append_child(child);
    doc.set_root(root);

    let xml = doc.to_xml_string(&WriterConfig::default()).unwrap();
    let parsed = roxmltree::Document::parse(&xml).unwrap();
    let child = parsed.root_element().first_element_child().unwrap();
    assert_eq!(child.tag_name().namespace(), Some("urn:a"));
    assert_eq!(child.attribute(("urn:b", "attr")), Some("v"));

    let reread = Document::from_string(&xml).unwrap();
    let child = &reread.root().unwrap().children()[0];
    assert_eq!(child.namespace(), Some("urn:a"));
    assert_eq!(child.get_attribute_ns(Some("urn:b"), "attr"), Some("v"));
}

#[test]
fn test_unprefixed_attribute_is_not_an_xml_attribute() {
    let doc = Document::from_string(r#"<root id="1"/>"#).unwrap();
    let node = doc.root().unwrap().get_attribute_node("id").unwrap();
    let err = XmlAttribute::from_dom_node(node).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<root xmlns:ex="urn:example" ex:role="admin"/>"#
    )
    .unwrap();

    let doc = Document::from_file(file.path()).unwrap();
    let node = doc
        .root()
        .unwrap()
        .get_attribute_node_ns(Some("urn:example"), "role")
        .unwrap();
    assert_eq!(
        XmlAttribute::from_dom_node(node).unwrap(),
        XmlAttribute::new(Some("urn:example"), "ex", "role", "admin").unwrap()
    );
}

#[test]
fn test_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::from_file(dir.path().join("missing.xml")).unwrap_err();
    match err {
        Error::Io(io) => assert!(io.message().contains("Failed to read file")),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xml");
    let doc = sample_document();

    doc.save(&path, &WriterConfig::default()).unwrap();
    let reloaded = Document::from_file(&path).unwrap();
    assert_eq!(
        reloaded.to_xml_string(&WriterConfig::default()).unwrap(),
        doc.to_xml_string(&WriterConfig::default()).unwrap()
    );
}

#[test]
fn test_strict_limits_reject_deep_documents() {
    let xml = format!("{}{}", "<a>".repeat(101), "</a>".repeat(101));
    let err = Document::parse_with_limits(xml.as_bytes(), &Limits::strict()).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(_)));
    assert!(Document::parse(xml.as_bytes()).is_ok());
}

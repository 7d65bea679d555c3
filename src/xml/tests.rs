use super::*;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<experimentDescription>
  <experimentAbstract>
    <title>Scan &amp; sweep</title>
    <relatedExperiments/>
    <notes></notes>
  </experimentAbstract>
  <metaInformation>
    <device id="a"><name>first</name></device>
    <device id="b"><name>second</name></device>
  </metaInformation>
</experimentDescription>"#;

fn sample() -> XmlElement {
    parse(std::io::Cursor::new(SAMPLE)).unwrap()
}

#[test]
fn test_parse_structure() {
    let root = sample();

    assert_eq!(root.name, "experimentDescription");
    assert_eq!(root.text, None);
    assert_eq!(root.child_text("experimentAbstract/title"), Some("Scan & sweep"));
    assert_eq!(root.find_all("metaInformation/device").len(), 2);
    assert_eq!(
        root.find_all("metaInformation/device")[1].attribute("id"),
        Some("b")
    );
}

#[test]
fn test_absent_and_empty_text_are_distinct() {
    let root = sample();

    // Present but childless, with and without an explicit end tag
    assert_eq!(root.child_text("experimentAbstract/relatedExperiments"), Some(""));
    assert_eq!(root.child_text("experimentAbstract/notes"), Some(""));
    // Absent
    assert_eq!(root.child_text("experimentAbstract/experimentSummary"), None);
}

#[test]
fn test_write_then_parse_preserves_text() {
    let mut root = XmlElement::new("root");
    root.push(XmlElement::with_text("multi", "line one\n\n    {\n  \"a\": 1\n}"));
    root.push(XmlElement::with_text("escaped", "a < b && \"c\""));
    root.push(XmlElement::new("empty"));

    let mut out = Vec::new();
    write(&root, &mut out).unwrap();
    let text = String::from_utf8(out.clone()).unwrap();

    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("\n  <empty/>"));
    assert!(text.contains("a &lt; b &amp;&amp; \"c\""));

    let reparsed = parse(std::io::Cursor::new(out)).unwrap();
    assert_eq!(reparsed.child_text("multi"), Some("line one\n\n    {\n  \"a\": 1\n}"));
    assert_eq!(reparsed.child_text("escaped"), Some("a < b && \"c\""));
    assert_eq!(reparsed.child_text("empty"), Some(""));
}

#[test]
fn test_insert_after_keeps_groups() {
    let mut parent = XmlElement::new("experimentAbstract")
        .child(XmlElement::new("title"))
        .child(XmlElement::new("notes"))
        .child(XmlElement::new("furtherDocumentation"));

    parent.insert_after(&["notes", "author"], XmlElement::with_text("author", "a"));
    parent.insert_after(&["notes", "author"], XmlElement::with_text("author", "b"));
    parent.insert_after(&["missing"], XmlElement::new("tail"));

    let names: Vec<_> = parent.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["title", "notes", "author", "author", "furtherDocumentation", "tail"]
    );
    assert_eq!(parent.children[3].text(), "b");
}

#[test]
fn test_find_mut_updates_in_place() {
    let mut root = sample();
    root.find_mut("experimentAbstract/title")
        .unwrap()
        .set_text("Renamed");

    assert_eq!(root.child_text("experimentAbstract/title"), Some("Renamed"));
    assert!(root.find_mut("experimentAbstract/nothing").is_none());
}

#[test]
fn test_unbalanced_document_is_rejected() {
    let result = parse(std::io::Cursor::new("<a><b></b>"));
    assert!(result.is_err());

    let result = parse(std::io::Cursor::new("<a/><b/>"));
    assert!(matches!(result, Err(XmlError::InvalidStructure(_))));

    let result = parse(std::io::Cursor::new(""));
    assert!(matches!(result, Err(XmlError::InvalidStructure(_))));
}

#[test]
fn test_mismatched_end_tag_is_an_error() {
    let result = parse(std::io::Cursor::new("<a><b></c></a>"));
    assert!(result.is_err());
}

#[test]
fn test_find_or_create_builds_missing_path() {
    let mut root = XmlElement::new("experimentDescription");
    root.find_or_create("metaInformation/radioFrequency/startFrequency")
        .set_text("400");
    root.find_or_create("metaInformation/radioFrequency/stopFrequency")
        .set_text("420");

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.find_all("metaInformation/radioFrequency").len(), 1);
    assert_eq!(
        root.child_text("metaInformation/radioFrequency/stopFrequency"),
        Some("420")
    );
}

#[test]
fn test_attribute_values_are_unescaped() {
    let root = parse(std::io::Cursor::new(
        r#"<root><device id="a &amp; b" note="&lt;x&gt;"/><device id='plain'/></root>"#,
    ))
    .unwrap();

    let devices = root.find_all("device");
    assert_eq!(devices[0].attribute("id"), Some("a & b"));
    assert_eq!(devices[0].attribute("note"), Some("<x>"));
    assert_eq!(devices[1].attribute("id"), Some("plain"));
    assert_eq!(devices[1].attribute("note"), None);
}

use std::io::Write;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{XmlElement, XmlError};

/// Number of spaces per nesting level in written documents
const INDENT_SIZE: usize = 2;

/// Write `root` as a complete, indented UTF-8 document
pub fn write<W: Write>(root: &XmlElement, writer: W) -> Result<(), XmlError> {
    let mut xml = Writer::new_with_indent(writer, b' ', INDENT_SIZE);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut xml, root)?;
    xml.get_mut().write_all(b"\n")?;
    xml.get_mut().flush()?;
    Ok(())
}

fn write_element<W: Write>(xml: &mut Writer<W>, element: &XmlElement) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && element.children.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    if let Some(text) = text {
        // Leaf text goes inline so embedded payloads keep their exact bytes
        xml.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }
    for child in &element.children {
        write_element(xml, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

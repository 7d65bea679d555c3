use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{XmlElement, XmlError};

/// Parse a complete document into an owned element tree
pub fn parse<R: BufRead>(reader: R) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if root.is_some() {
                    return Err(XmlError::InvalidStructure(
                        "content after the root element".to_string(),
                    ));
                }
                stack.push(element_from_start(e, reader.decoder())?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e, reader.decoder())?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::InvalidStructure("unexpected closing tag".to_string())
                })?;
                close_element(drop_indentation(element), &mut stack, &mut root)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let bytes = e.into_inner();
                append_text(&mut stack, std::str::from_utf8(&bytes)?)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlError::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::InvalidStructure(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| XmlError::InvalidStructure("document has no root element".to_string()))
}

fn element_from_start(e: &BytesStart, decoder: Decoder) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement::new(std::str::from_utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::InvalidStructure(
            "text outside the root element".to_string(),
        )),
    }
}

/// Whitespace between child elements is pretty-print indentation, not content
fn drop_indentation(mut element: XmlElement) -> XmlElement {
    if !element.children.is_empty() && element.text().trim().is_empty() {
        element.text = None;
    }
    element
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(XmlError::InvalidStructure(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

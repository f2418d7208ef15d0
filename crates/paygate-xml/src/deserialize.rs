//! Decoding gateway XML into a [`ParameterSet`].

use paygate_auth::ParameterSet;
use quick_xml::Reader;
use quick_xml::events::{BytesText, Event};
use tracing::debug;

use crate::error::XmlError;

/// Parse a flat XML document into a parameter set.
///
/// The root element name is not checked. Each child element becomes one
/// parameter; `<field/>` yields an empty value. Text and CDATA sections are
/// concatenated verbatim, entity references are resolved.
///
/// # Errors
///
/// Returns [`XmlError`] if there is no root element, a child element is
/// nested, a field repeats, or content follows the root element.
pub fn from_xml(xml: &str) -> Result<ParameterSet, XmlError> {
    let mut reader = Reader::from_str(xml);

    let root = loop {
        match reader.read_event()? {
            Event::Start(e) => break element_name(e.name().as_ref())?,
            Event::Empty(_) => return Ok(ParameterSet::new()),
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::UnexpectedElement(
                    "text before root element".to_owned(),
                ));
            }
            Event::Eof => return Err(XmlError::MissingElement("root element".to_owned())),
            // Skip declaration, comments, processing instructions, doctype.
            _ => {}
        }
    };

    let mut params = ParameterSet::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref())?;
                let value = read_text_content(&mut reader, &name)?;
                insert_unique(&mut params, name, value)?;
            }
            Event::Empty(e) => {
                let name = element_name(e.name().as_ref())?;
                insert_unique(&mut params, name, String::new())?;
            }
            Event::End(_) => break,
            Event::Text(e) if is_blank(&e) => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                return Err(XmlError::UnexpectedElement(format!(
                    "text directly inside <{root}>"
                )));
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in <{root}>"
                )));
            }
            _ => {}
        }
    }

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Text(e) if is_blank(&e) => {}
            Event::Comment(_) | Event::PI(_) => {}
            _ => {
                return Err(XmlError::UnexpectedElement(format!(
                    "content after </{root}>"
                )));
            }
        }
    }

    debug!(root = %root, fields = params.len(), "Decoded XML parameters");
    Ok(params)
}

/// Read the text content of a leaf element and consume its end tag.
fn read_text_content(reader: &mut Reader<&[u8]>, name: &str) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let decoded = std::str::from_utf8(&bytes)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(decoded);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{entity};")))?;
                    text.push_str(resolved);
                }
            }
            Event::Start(_) | Event::Empty(_) => {
                return Err(XmlError::UnexpectedElement(format!(
                    "nested element inside <{name}>"
                )));
            }
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF while reading <{name}>"
                )));
            }
            _ => {}
        }
    }
}

fn insert_unique(params: &mut ParameterSet, name: String, value: String) -> Result<(), XmlError> {
    if params.contains_key(&name) {
        return Err(XmlError::DuplicateElement(name));
    }
    params.insert(name, value);
    Ok(())
}

fn element_name(raw: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(raw)
        .map(ToOwned::to_owned)
        .map_err(|e| XmlError::ParseError(e.to_string()))
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

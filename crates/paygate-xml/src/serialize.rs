//! Encoding a [`ParameterSet`] as flat gateway XML.

use std::io;

use paygate_auth::ParameterSet;
use quick_xml::Writer;
use quick_xml::events::BytesText;

use crate::error::XmlError;

/// Root element of gateway documents.
pub const ROOT_ELEMENT: &str = "xml";

/// Render `params` as `<xml><k>v</k>...</xml>` in key order.
///
/// Values are escaped; empty values are written as empty elements so that
/// the receiver sees the same field set that was signed.
///
/// # Errors
///
/// Returns [`XmlError::InvalidName`] if a key is not a valid element name.
///
/// # Examples
///
/// ```
/// use paygate_auth::ParameterSet;
/// use paygate_xml::to_xml;
///
/// let params: ParameterSet = [("b", "x&y"), ("a", "1")].into_iter().collect();
/// assert_eq!(to_xml(&params).unwrap(), "<xml><a>1</a><b>x&amp;y</b></xml>");
/// ```
pub fn to_xml(params: &ParameterSet) -> Result<String, XmlError> {
    if let Some((name, _)) = params.iter().find(|(name, _)| !is_valid_name(name)) {
        return Err(XmlError::InvalidName(name.to_owned()));
    }

    let mut buf = Vec::with_capacity(64 + params.len() * 48);
    write_params(&mut buf, params)?;
    String::from_utf8(buf).map_err(|e| XmlError::ParseError(e.to_string()))
}

fn write_params(buf: &mut Vec<u8>, params: &ParameterSet) -> io::Result<()> {
    let mut writer = Writer::new(buf);
    writer
        .create_element(ROOT_ELEMENT)
        .write_inner_content(|w| {
            for (name, value) in params.iter() {
                w.create_element(name)
                    .write_text_content(BytesText::new(value))?;
            }
            Ok(())
        })?;
    Ok(())
}

/// Conservative element-name check: ASCII letter or `_` first, then
/// letters, digits, `_`, `-`, `.`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deserialize::from_xml;

    #[test]
    fn test_should_write_fields_in_key_order() {
        let params: ParameterSet = [("nonce_str", "abc"), ("appid", "wx1"), ("mch_id", "100")]
            .into_iter()
            .collect();
        assert_eq!(
            to_xml(&params).unwrap(),
            "<xml><appid>wx1</appid><mch_id>100</mch_id><nonce_str>abc</nonce_str></xml>"
        );
    }

    #[test]
    fn test_should_keep_empty_values_as_fields() {
        let params: ParameterSet = [("attach", ""), ("body", "t")].into_iter().collect();
        let decoded = from_xml(&to_xml(&params).unwrap()).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn test_should_escape_markup_in_values() {
        let params: ParameterSet = [("detail", "<goods> & \"more\"")].into_iter().collect();
        let xml = to_xml(&params).unwrap();
        assert!(!xml.contains("<goods>"));
        assert_eq!(from_xml(&xml).unwrap().get("detail"), Some("<goods> & \"more\""));
    }

    #[test]
    fn test_should_reject_invalid_element_names() {
        for bad in ["", "1abc", "a b", "a<b", "a&b"] {
            let params: ParameterSet = [(bad, "v")].into_iter().collect();
            assert!(
                matches!(to_xml(&params), Err(XmlError::InvalidName(_))),
                "{bad:?}"
            );
        }
    }
}

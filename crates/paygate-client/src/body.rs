//! Encoding a signed parameter set as an HTTP request body.

use paygate_auth::ParameterSet;
use paygate_core::{GatewayError, GatewayResult, RequestEncoding};

/// Content type of form-encoded bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content type of XML bodies.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// A request body ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBody {
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// The encoded body.
    pub content: String,
}

/// Encode `params` in key order using `encoding`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if a parameter name cannot be
/// written as an XML element.
pub fn encode_body(params: &ParameterSet, encoding: RequestEncoding) -> GatewayResult<WireBody> {
    match encoding {
        RequestEncoding::Form => {
            let content = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter())
                .finish();
            Ok(WireBody {
                content_type: FORM_CONTENT_TYPE,
                content,
            })
        }
        RequestEncoding::Xml => {
            let content = paygate_xml::to_xml(params)
                .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
            Ok(WireBody {
                content_type: XML_CONTENT_TYPE,
                content,
            })
        }
    }
}

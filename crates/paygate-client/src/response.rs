//! Gateway responses and their signature check.

use paygate_auth::{ParameterSet, RequestKind, RequestPolicy, SIGN_FIELD, verify_parameters};
use paygate_core::{GatewayError, GatewayResult, MissingSignPolicy};
use tracing::{debug, warn};

const SUCCESS: &str = "SUCCESS";

/// A decoded gateway response.
///
/// Keeps both wire bodies so callers can log or persist them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    kind: RequestKind,
    request_body: String,
    body: String,
    params: ParameterSet,
    document: bool,
}

/// Kinds whose successful answer is a plain-text document instead of `<xml>`.
fn returns_document(kind: RequestKind) -> bool {
    matches!(kind, RequestKind::DownloadFundFlow)
}

impl GatewayResponse {
    /// Decode a raw response body.
    ///
    /// A download kind whose body does not start with markup is kept as a
    /// document: no decoded fields, only [`GatewayResponse::body`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EmptyBody`] if `body` is empty or blank, and
    /// [`GatewayError::SignatureMismatch`] if it is not flat XML with unique
    /// fields and is not a document.
    pub fn parse(
        kind: RequestKind,
        request_body: impl Into<String>,
        body: impl Into<String>,
    ) -> GatewayResult<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(GatewayError::EmptyBody);
        }
        if returns_document(kind) && !body.trim_start().starts_with('<') {
            debug!(kind = %kind, bytes = body.len(), "Keeping response as document");
            return Ok(Self {
                kind,
                request_body: request_body.into(),
                body,
                params: ParameterSet::new(),
                document: true,
            });
        }
        let params = paygate_xml::from_xml(&body)
            .map_err(|e| GatewayError::signature_mismatch(format!("undecodable response: {e}")))?;

        Ok(Self {
            kind,
            request_body: request_body.into(),
            body,
            params,
            document: false,
        })
    }

    /// Whether the body is a downloaded document rather than `<xml>` fields.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.document
    }

    /// The request kind that produced this response.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The body that was sent.
    #[must_use]
    pub fn request_body(&self) -> &str {
        &self.request_body
    }

    /// The raw body that was received.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decoded response fields.
    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Consume the response, keeping only the decoded fields.
    #[must_use]
    pub fn into_params(self) -> ParameterSet {
        self.params
    }

    /// A single decoded field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.params.get(field)
    }

    /// The response signature, if present and non-empty.
    #[must_use]
    pub fn sign(&self) -> Option<&str> {
        self.params.get_non_empty(SIGN_FIELD)
    }

    /// `return_code`: communication-level status.
    #[must_use]
    pub fn return_code(&self) -> Option<&str> {
        self.params.get("return_code")
    }

    /// `return_msg`: communication-level message.
    #[must_use]
    pub fn return_msg(&self) -> Option<&str> {
        self.params.get("return_msg")
    }

    /// `result_code`: business-level status.
    #[must_use]
    pub fn result_code(&self) -> Option<&str> {
        self.params.get("result_code")
    }

    /// `err_code`: business error code.
    #[must_use]
    pub fn err_code(&self) -> Option<&str> {
        self.params.get("err_code")
    }

    /// `err_code_des`: business error description.
    #[must_use]
    pub fn err_code_des(&self) -> Option<&str> {
        self.params.get("err_code_des")
    }

    /// Whether the gateway reported a failure.
    ///
    /// True when `return_code` is not `SUCCESS` (including when it is
    /// absent), or when `result_code` is present and not `SUCCESS`. A
    /// document is never an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        if self.document {
            return false;
        }
        self.return_code() != Some(SUCCESS)
            || self.result_code().is_some_and(|code| code != SUCCESS)
    }
}

/// Check the signature of a decoded response.
///
/// Error responses and downloaded documents are not checked; the gateway
/// signs neither.
/// An unsigned successful response is accepted or rejected per `missing_sign`.
///
/// # Errors
///
/// Returns [`GatewayError::EmptyBody`] for a blank body, and
/// [`GatewayError::SignatureMismatch`] if the signature is wrong, or absent
/// under [`MissingSignPolicy::Reject`].
pub fn verify_response(
    response: &GatewayResponse,
    policy: &RequestPolicy,
    key: &str,
    missing_sign: MissingSignPolicy,
) -> GatewayResult<()> {
    if response.body().trim().is_empty() {
        return Err(GatewayError::EmptyBody);
    }

    if response.is_document() {
        debug!(kind = %response.kind(), "Skipping signature check for document");
        return Ok(());
    }

    if response.is_error() {
        debug!(
            kind = %response.kind(),
            return_code = response.return_code().unwrap_or_default(),
            result_code = response.result_code().unwrap_or_default(),
            "Skipping signature check for error response"
        );
        return Ok(());
    }

    if response.sign().is_none() {
        return match missing_sign {
            MissingSignPolicy::Skip => {
                warn!(kind = %response.kind(), "Accepting unsigned response");
                Ok(())
            }
            MissingSignPolicy::Reject => Err(GatewayError::signature_mismatch(
                "response carries no signature",
            )),
        };
    }

    verify_parameters(
        response.params(),
        policy.sign_type,
        policy.exclude_sign_type,
        key,
    )
    .map_err(GatewayError::from)
}

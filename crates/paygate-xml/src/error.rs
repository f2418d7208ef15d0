//! XML error types.

/// Errors that can occur while encoding or decoding gateway XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// The same field appeared more than once.
    #[error("duplicate XML element: {0}")]
    DuplicateElement(String),

    /// A parameter name cannot be used as an XML element name.
    #[error("invalid XML element name: {0:?}")]
    InvalidName(String),

    /// An error decoding text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

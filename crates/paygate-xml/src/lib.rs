//! Flat XML layer for the paygate wire format.
//!
//! The gateway exchanges documents with a single root element whose children
//! are the parameters, one element per field:
//!
//! ```xml
//! <xml>
//!   <return_code><![CDATA[SUCCESS]]></return_code>
//!   <mch_id>10000100</mch_id>
//!   <sign>9A0A8659F005D6984697E2CA0A9CF3B7</sign>
//! </xml>
//! ```
//!
//! # Key components
//!
//! - [`from_xml`] parses a response body into a [`ParameterSet`](paygate_auth::ParameterSet)
//! - [`to_xml`] renders a parameter set as a request body
//!
//! Decoding is strict. Nested elements, repeated fields, and content after
//! the root element are errors.

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::from_xml;
pub use error::XmlError;
pub use serialize::{ROOT_ELEMENT, to_xml};

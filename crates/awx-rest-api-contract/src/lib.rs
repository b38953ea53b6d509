//! AWX REST API contract types and validation
//!
//! This crate defines the resource models sent to and received from the
//! AWX `/api/v2/` endpoints, the rules used to encode them on the wire, and
//! the validation applied before a model is ever serialized.

pub mod error;
pub mod types;
pub mod validation;
pub mod wire;

pub use error::*;
pub use types::*;
pub use validation::*;

pub mod correlation;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod ports;
pub mod services;

pub use errors::{CoreError, ErrorKind, ExternalServiceError, ValidationError};

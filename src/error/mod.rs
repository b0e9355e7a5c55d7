// Failure Types and Boundary Conversions
// "Name the failure before you fight it"

use std::collections::HashMap;
use thiserror::Error;

mod classification;
mod context;

pub use classification::{
    classify, display_message, flatten_field_errors, log_classified, should_retry, Classify,
    ClassifiedError, ErrorKind,
};
pub use context::{ContextualError, ErrorContextInfo};

/// Upstream failures as a closed set of variants, produced at the boundary
/// where an operation fails. Downstream code never inspects raw error values;
/// it classifies one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Failure {
    /// An API-error-shaped failure. `status` is `None` when the request never
    /// produced a response, which classification treats as a connectivity
    /// failure.
    #[error("HTTP request failed: {message}")]
    Http {
        status: Option<u16>,
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    /// A runtime error that only carries message text.
    #[error("{message}")]
    Native { message: String },

    /// Anything else that was thrown at us.
    #[error("Unknown failure")]
    Unknown { detail: Option<String> },
}

impl Failure {
    /// Create an HTTP failure without field-level errors
    pub fn http<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::Http {
            status,
            message: message.into(),
            field_errors: None,
        }
    }

    /// Create an HTTP failure carrying per-field validation messages
    pub fn http_with_fields<S: Into<String>>(
        status: Option<u16>,
        message: S,
        field_errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Http {
            status,
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Create a native failure from message text
    pub fn native<S: Into<String>>(message: S) -> Self {
        Self::Native {
            message: message.into(),
        }
    }

    /// Create an unknown failure, optionally keeping a debug rendering of the
    /// original value
    pub fn unknown(detail: Option<String>) -> Self {
        Self::Unknown { detail }
    }
}

pub(crate) fn io_failure(kind: std::io::ErrorKind, text: String) -> Failure {
    match kind {
        std::io::ErrorKind::TimedOut => Failure::native(format!("ETIMEDOUT: {text}")),
        std::io::ErrorKind::ConnectionRefused
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::NotConnected => Failure::native(format!("Network Error: {text}")),
        _ => Failure::native(text),
    }
}

/// Convert std::io::Error to Failure
impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        io_failure(error.kind(), error.to_string())
    }
}

/// Convert serde_json::Error to Failure
impl From<serde_json::Error> for Failure {
    fn from(error: serde_json::Error) -> Self {
        Failure::native(error.to_string())
    }
}

/// Result type alias for convenience
pub type BridgeResult<T> = Result<T, Failure>;

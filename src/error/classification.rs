// Error Classification
// "Understanding the nature of our failures"

use crate::error::Failure;
use std::collections::HashMap;

const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
const VALIDATION_MESSAGE: &str = "Please review the highlighted fields and try again.";
const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";
const SERVER_MESSAGE: &str = "Something went wrong on our end. Please try again later.";
const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
const UNKNOWN_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Closed set of failure categories driving UI feedback and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Auth,
    Validation,
    NotFound,
    RateLimit,
    Server,
    Timeout,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        Self::Network,
        Self::Auth,
        Self::Validation,
        Self::NotFound,
        Self::RateLimit,
        Self::Server,
        Self::Timeout,
        Self::Unknown,
    ];

    /// Stable key for logging and stats
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Check if failures of this kind are transient and worth reattempting
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::RateLimit | Self::Server | Self::Timeout => true,
            Self::Auth | Self::Validation | Self::NotFound | Self::Unknown => false,
        }
    }

    /// Get severity level for logging
    pub fn severity(&self) -> tracing::Level {
        match self {
            Self::Server | Self::Unknown => tracing::Level::ERROR,
            Self::Network | Self::RateLimit | Self::Timeout => tracing::Level::WARN,
            Self::Auth | Self::NotFound => tracing::Level::INFO,
            Self::Validation => tracing::Level::DEBUG,
        }
    }

    /// Notification title for this kind of failure
    pub fn title(&self) -> &'static str {
        match self {
            Self::Network => "Connection Error",
            Self::Auth => "Authentication Error",
            Self::Validation => "Validation Error",
            Self::NotFound => "Not Found",
            Self::RateLimit => "Rate Limited",
            Self::Server => "Server Error",
            Self::Timeout => "Request Timeout",
            Self::Unknown => "Error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, typed representation of an arbitrary failure. Constructed
/// fresh on every classification and held only for a single handling cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// User-facing message, never empty
    pub message: String,
    /// Status code, present only when the source failure carried one
    pub status: Option<u16>,
    /// Per-field violation messages, present only for `Validation`
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// The original failure, retained unmutated for logging
    pub source: Failure,
}

impl ClassifiedError {
    /// Retryability is derived from the kind, never independently settable
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn severity(&self) -> tracing::Level {
        self.kind.severity()
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

fn prefer_source(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

/// Classify a failure. Total over every `Failure` value; never panics.
pub fn classify(failure: Failure) -> ClassifiedError {
    let (kind, message, status, field_errors) = match &failure {
        Failure::Http {
            status,
            message,
            field_errors,
        } => match *status {
            None => (ErrorKind::Network, NETWORK_MESSAGE.to_string(), None, None),
            Some(401) => (
                ErrorKind::Auth,
                SESSION_EXPIRED_MESSAGE.to_string(),
                Some(401),
                None,
            ),
            Some(403) => (
                ErrorKind::Auth,
                PERMISSION_DENIED_MESSAGE.to_string(),
                Some(403),
                None,
            ),
            Some(404) => (
                ErrorKind::NotFound,
                prefer_source(message, NOT_FOUND_MESSAGE),
                Some(404),
                None,
            ),
            Some(code @ (400 | 422)) => (
                ErrorKind::Validation,
                prefer_source(message, VALIDATION_MESSAGE),
                Some(code),
                field_errors.clone(),
            ),
            Some(429) => (
                ErrorKind::RateLimit,
                RATE_LIMIT_MESSAGE.to_string(),
                Some(429),
                None,
            ),
            Some(code) if code >= 500 => (
                ErrorKind::Server,
                SERVER_MESSAGE.to_string(),
                Some(code),
                None,
            ),
            Some(code) => (
                ErrorKind::Unknown,
                UNKNOWN_MESSAGE.to_string(),
                Some(code),
                None,
            ),
        },
        Failure::Native { message } => {
            if message.contains("Network Error") || message.contains("Failed to fetch") {
                (ErrorKind::Network, NETWORK_MESSAGE.to_string(), None, None)
            } else if message.contains("timeout") || message.contains("ETIMEDOUT") {
                (ErrorKind::Timeout, TIMEOUT_MESSAGE.to_string(), None, None)
            } else {
                (
                    ErrorKind::Unknown,
                    prefer_source(message, UNKNOWN_MESSAGE),
                    None,
                    None,
                )
            }
        }
        Failure::Unknown { .. } => (ErrorKind::Unknown, UNKNOWN_MESSAGE.to_string(), None, None),
    };

    ClassifiedError {
        kind,
        message,
        status,
        field_errors,
        source: failure,
    }
}

/// Extract the user-facing message for a failure
pub fn display_message(failure: &Failure) -> String {
    classify(failure.clone()).message
}

/// Check whether an operation that produced this failure is worth retrying
pub fn should_retry(failure: &Failure) -> bool {
    classify(failure.clone()).is_retryable()
}

/// Flatten per-field violation lists into one message per field for form
/// binding. Takes the first message per field, or "Invalid value" when the
/// list is empty or its first entry is blank.
pub fn flatten_field_errors(
    field_errors: &HashMap<String, Vec<String>>,
) -> HashMap<String, String> {
    field_errors
        .iter()
        .map(|(field, messages)| {
            let message = messages
                .first()
                .filter(|m| !m.is_empty())
                .cloned()
                .unwrap_or_else(|| "Invalid value".to_string());
            (field.clone(), message)
        })
        .collect()
}

/// Record a classified failure to the diagnostic sink. One-way side effect:
/// no return value, no influence on classification, never fails the caller.
pub fn log_classified(classified: &ClassifiedError, context: Option<&str>) {
    match classified.severity() {
        tracing::Level::ERROR => tracing::error!(
            error = %classified.message,
            kind = classified.kind.as_str(),
            status = ?classified.status,
            retryable = classified.is_retryable(),
            context = ?context,
            source = ?classified.source,
            "Operation failed"
        ),
        tracing::Level::WARN => tracing::warn!(
            error = %classified.message,
            kind = classified.kind.as_str(),
            status = ?classified.status,
            retryable = classified.is_retryable(),
            context = ?context,
            source = ?classified.source,
            "Operation failed"
        ),
        tracing::Level::INFO => tracing::info!(
            error = %classified.message,
            kind = classified.kind.as_str(),
            status = ?classified.status,
            retryable = classified.is_retryable(),
            context = ?context,
            source = ?classified.source,
            "Operation failed"
        ),
        tracing::Level::DEBUG => tracing::debug!(
            error = %classified.message,
            kind = classified.kind.as_str(),
            status = ?classified.status,
            retryable = classified.is_retryable(),
            context = ?context,
            source = ?classified.source,
            "Operation failed"
        ),
        tracing::Level::TRACE => tracing::trace!(
            error = %classified.message,
            kind = classified.kind.as_str(),
            status = ?classified.status,
            retryable = classified.is_retryable(),
            context = ?context,
            source = ?classified.source,
            "Operation failed"
        ),
    }
}

/// Trait for error types that can produce a classification verdict. The retry
/// policy uses this to decide whether a failed attempt is worth repeating
/// while returning the original error unchanged.
pub trait Classify {
    fn classify(&self) -> ClassifiedError;
}

impl Classify for Failure {
    fn classify(&self) -> ClassifiedError {
        classify(self.clone())
    }
}

impl Classify for ClassifiedError {
    fn classify(&self) -> ClassifiedError {
        self.clone()
    }
}

impl Classify for std::io::Error {
    fn classify(&self) -> ClassifiedError {
        classify(crate::error::io_failure(self.kind(), self.to_string()))
    }
}

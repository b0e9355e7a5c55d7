// Bridge Resilience - Core Library
// "A bridge is judged by how it holds when a span fails"

pub mod error;
pub mod handler;
pub mod logging;
pub mod retry;

// Re-export commonly used types
pub use error::{
    classify, display_message, flatten_field_errors, log_classified, should_retry, BridgeResult,
    Classify, ClassifiedError, ContextualError, ErrorContextInfo, ErrorKind, Failure,
};
pub use handler::{
    ErrorHandler, ErrorStats, HandlerConfig, Notification, NotificationSeverity, Notifier,
};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use retry::{CancelHandle, Retry, RetryConfig};

// Error Context and Tracing
// "Rich metadata for failure correlation and debugging"

use crate::error::ClassifiedError;
use std::time::SystemTime;
use uuid::Uuid;

/// Error context for correlation and tracing
#[derive(Debug, Clone)]
pub struct ErrorContextInfo {
    pub correlation_id: Uuid,
    pub operation: Option<String>,
    pub component: Option<String>,
    pub timestamp: SystemTime,
}

impl Default for ErrorContextInfo {
    fn default() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            operation: None,
            component: None,
            timestamp: SystemTime::now(),
        }
    }
}

/// Classified failure with additional correlation metadata
#[derive(Debug, Clone)]
pub struct ContextualError {
    pub error: ClassifiedError,
    pub context: ErrorContextInfo,
}

impl ClassifiedError {
    /// Attach correlation metadata to a classified failure
    pub fn with_context(self, context: ErrorContextInfo) -> ContextualError {
        ContextualError {
            error: self,
            context,
        }
    }

    /// Attach freshly generated correlation metadata
    pub fn with_default_context(self) -> ContextualError {
        self.with_context(ErrorContextInfo::default())
    }
}

impl ContextualError {
    /// Log the failure with full context information
    pub fn log_with_context(&self) {
        tracing::error!(
            error = %self.error.message,
            correlation_id = %self.context.correlation_id,
            operation = ?self.context.operation,
            component = ?self.context.component,
            kind = self.error.kind.as_str(),
            status = ?self.error.status,
            retryable = self.error.is_retryable(),
            "Operation failed with context"
        );
    }

    pub fn error(&self) -> &ClassifiedError {
        &self.error
    }

    pub fn context(&self) -> &ErrorContextInfo {
        &self.context
    }
}

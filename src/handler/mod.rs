// Error Handler and Centralized Processing
// "One failure at a time, never lost in the noise"

mod stats;

pub use stats::ErrorStats;

use crate::error::{
    classify, flatten_field_errors, log_classified, ClassifiedError, ErrorContextInfo, ErrorKind,
    Failure,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Default,
    Destructive,
}

/// A request to display a transient message to the user. Delivery is the
/// collaborator's concern; the handler only decides content and severity.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: NotificationSeverity,
}

/// Capability for surfacing notifications, injected rather than ambient so
/// the handler stays testable in isolation
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Handler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Raise a user-visible notification for each handled failure
    pub notify: bool,
    /// Record each handled failure to the diagnostic sink
    pub log: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            notify: true,
            log: true,
        }
    }
}

type ErrorCallback = Box<dyn Fn(&ClassifiedError) + Send + Sync>;

/// Coordination layer over classification: stores the current failure
/// (single slot, last-write-wins), surfaces notifications, and exposes the
/// flattened field-error map for form binding. Performs no I/O itself.
pub struct ErrorHandler {
    config: HandlerConfig,
    notifier: Option<Arc<dyn Notifier>>,
    on_error: Option<ErrorCallback>,
    current: Mutex<Option<ClassifiedError>>,
    field_errors: Mutex<HashMap<String, String>>,
    stats: ErrorStats,
}

impl ErrorHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            config,
            notifier: None,
            on_error: None,
            current: Mutex::new(None),
            field_errors: Mutex::new(HashMap::new()),
            stats: ErrorStats::new(),
        }
    }

    /// Attach a notification collaborator
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Attach a callback invoked with every classified failure
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ClassifiedError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Classify a failure, store it as the current error, and dispatch the
    /// configured side effects. Returns the classification.
    pub fn handle_error(&self, failure: Failure, context: Option<&str>) -> ClassifiedError {
        let classified = classify(failure);
        self.stats.track(&classified);

        if self.config.log {
            log_classified(&classified, context);
        }

        self.store_and_dispatch(classified)
    }

    /// Handle a failure with correlation metadata in the diagnostic record
    pub fn handle_error_with_operation(
        &self,
        failure: Failure,
        operation: &str,
        component: Option<&str>,
    ) -> ClassifiedError {
        let classified = classify(failure);
        self.stats.track(&classified);

        if self.config.log {
            let context = ErrorContextInfo {
                operation: Some(operation.to_string()),
                component: component.map(|c| c.to_string()),
                ..Default::default()
            };
            classified.clone().with_context(context).log_with_context();
        }

        self.store_and_dispatch(classified)
    }

    fn store_and_dispatch(&self, classified: ClassifiedError) -> ClassifiedError {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(classified.clone());
        }

        if let Ok(mut fields) = self.field_errors.lock() {
            match (&classified.kind, &classified.field_errors) {
                (ErrorKind::Validation, Some(map)) => *fields = flatten_field_errors(map),
                _ => fields.clear(),
            }
        }

        if self.config.notify {
            if let Some(notifier) = &self.notifier {
                let severity = match classified.kind {
                    ErrorKind::Auth | ErrorKind::Server => NotificationSeverity::Destructive,
                    _ => NotificationSeverity::Default,
                };
                notifier.notify(Notification {
                    title: classified.kind.title().to_string(),
                    body: classified.message.clone(),
                    severity,
                });
            }
        }

        if let Some(callback) = &self.on_error {
            callback(&classified);
        }

        classified
    }

    /// Discard the current error and its field-error map
    pub fn clear_error(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        if let Ok(mut fields) = self.field_errors.lock() {
            fields.clear();
        }
    }

    pub fn current_error(&self) -> Option<ClassifiedError> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn has_error(&self) -> bool {
        self.current
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Flattened message for one named field, if the current error is a
    /// validation failure touching it
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.field_errors
            .lock()
            .ok()
            .and_then(|fields| fields.get(field).cloned())
    }

    pub fn field_errors(&self) -> HashMap<String, String> {
        self.field_errors
            .lock()
            .map(|fields| fields.clone())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> &ErrorStats {
        &self.stats
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(HandlerConfig::default())
    }
}

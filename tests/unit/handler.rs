// Handler Scenarios
// Public-API coverage for the error-handling coordination layer

use bridge_resilience::{
    ErrorHandler, ErrorKind, Failure, HandlerConfig, Notification, Notifier,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CapturingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl Notifier for CapturingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}

fn quiet_config() -> HandlerConfig {
    HandlerConfig {
        notify: false,
        log: false,
    }
}

#[test]
fn two_errors_in_succession_keep_only_the_second() {
    let handler = ErrorHandler::new(quiet_config());

    handler.handle_error(Failure::http(Some(429), ""), Some("save_workflow"));
    handler.handle_error(Failure::http(Some(401), ""), Some("save_workflow"));

    let current = handler.current_error().unwrap();
    assert_eq!(current.kind, ErrorKind::Auth);
    assert_eq!(handler.stats().count(ErrorKind::RateLimit), 1);
    assert_eq!(handler.stats().count(ErrorKind::Auth), 1);
}

#[test]
fn rapid_failures_produce_one_notification_each() {
    let notifier = Arc::new(CapturingNotifier::default());
    let handler = ErrorHandler::new(HandlerConfig {
        notify: true,
        log: false,
    })
    .with_notifier(notifier.clone());

    for _ in 0..3 {
        handler.handle_error(Failure::http(Some(500), ""), None);
    }

    assert_eq!(notifier.sent.lock().unwrap().len(), 3);
}

#[test]
fn field_errors_follow_the_current_error() {
    let handler = ErrorHandler::new(quiet_config());

    let mut fields = HashMap::new();
    fields.insert("cron".to_string(), vec!["Invalid schedule".to_string()]);
    handler.handle_error(
        Failure::http_with_fields(Some(422), "Validation failed", fields),
        None,
    );
    assert_eq!(handler.field_error("cron").as_deref(), Some("Invalid schedule"));

    handler.clear_error();
    assert!(handler.field_error("cron").is_none());
    assert!(!handler.has_error());
}

#[test]
fn handler_is_shareable_across_threads() {
    let handler = Arc::new(ErrorHandler::new(quiet_config()));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || {
                handler.handle_error(Failure::http(Some(503), ""), None);
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(handler.stats().count(ErrorKind::Server), 4);
    assert!(handler.has_error());
}

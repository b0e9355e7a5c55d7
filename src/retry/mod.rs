// Retry Policy
// "Try again, but know when to stop"


use crate::error::{BridgeResult, Classify, ClassifiedError, Failure};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Base backoff delay; attempt n waits `base * 2^n`
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.base_delay_ms == 0 {
            return Err(Failure::native(
                "Invalid retry configuration: base_delay_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay()
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(Duration::MAX)
    }
}

/// Cooperative cancellation for an in-flight retry loop. Cancelling wakes a
/// backoff wait immediately; the loop stops before the next attempt.
#[derive(Debug, Default)]
pub struct CancelHandle {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    async fn wait(&self) {
        while !self.is_cancelled() {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Generic retry wrapper with exponential backoff. The retry decision comes
/// from classification: a non-retryable verdict aborts immediately, and the
/// original error is always returned unchanged.
pub struct Retry {
    config: RetryConfig,
    cancel: Arc<CancelHandle>,
    retry_count: AtomicU32,
    retrying: AtomicBool,
}

impl Retry {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(CancelHandle::new()),
            retry_count: AtomicU32::new(0),
            retrying: AtomicBool::new(false),
        }
    }

    /// Handle for cancelling an in-flight retry loop from another task
    pub fn cancel_handle(&self) -> Arc<CancelHandle> {
        Arc::clone(&self.cancel)
    }

    /// Retries performed so far in the current loop, zero when idle
    pub fn retry_count(&self) -> u32 {
        self.retry_count.load(Ordering::Relaxed)
    }

    /// Whether a retry loop is currently waiting or reattempting
    pub fn is_retrying(&self) -> bool {
        self.retrying.load(Ordering::Relaxed)
    }

    /// Reset observable state and clear any pending cancellation
    pub fn reset(&self) {
        self.retry_count.store(0, Ordering::Relaxed);
        self.retrying.store(false, Ordering::Relaxed);
        self.cancel.cancelled.store(false, Ordering::Relaxed);
    }

    /// Run `operation` with retries and no failure observer
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        E: Classify,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with(operation, |_, _| {}).await
    }

    /// Run `operation` up to `max_retries + 1` times, invoking
    /// `on_attempt_failure` with the classified error and zero-based attempt
    /// index after every failed attempt.
    pub async fn execute_with<T, E, F, Fut, C>(
        &self,
        mut operation: F,
        mut on_attempt_failure: C,
    ) -> Result<T, E>
    where
        E: Classify,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnMut(&ClassifiedError, u32),
    {
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    self.finish();
                    return Ok(value);
                }
                Err(error) => {
                    let classified = error.classify();
                    on_attempt_failure(&classified, attempt);

                    if !classified.is_retryable() {
                        debug!(
                            kind = classified.kind.as_str(),
                            attempt, "Failure is not retryable, aborting"
                        );
                        self.finish();
                        return Err(error);
                    }

                    if attempt >= self.config.max_retries {
                        warn!(
                            kind = classified.kind.as_str(),
                            attempts = attempt + 1,
                            "Retry budget exhausted"
                        );
                        self.finish();
                        return Err(error);
                    }

                    let delay = self.config.delay_for_attempt(attempt);
                    self.retrying.store(true, Ordering::Relaxed);
                    self.retry_count.store(attempt + 1, Ordering::Relaxed);
                    warn!(
                        kind = classified.kind.as_str(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after backoff"
                    );

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.cancel.wait() => {
                            debug!(attempt, "Retry loop cancelled during backoff");
                            self.finish();
                            return Err(error);
                        }
                    }

                    if self.cancel.is_cancelled() {
                        self.finish();
                        return Err(error);
                    }

                    attempt += 1;
                }
            }
        }
    }

    fn finish(&self) {
        self.retrying.store(false, Ordering::Relaxed);
        self.retry_count.store(0, Ordering::Relaxed);
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

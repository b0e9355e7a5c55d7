// Retry Scenarios
// Public-API coverage for the retry policy contract

use bridge_resilience::{Failure, Retry, RetryConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn fails_twice_then_succeeds_in_three_attempts() {
    let retry = Retry::new(RetryConfig {
        max_retries: 3,
        base_delay_ms: 10,
    });
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let started = Instant::now();
    let result: Result<&str, Failure> = retry
        .execute(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Failure::http(Some(502), "bad gateway"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn auth_failure_rejects_after_one_attempt() {
    let retry = Retry::new(RetryConfig {
        max_retries: 5,
        base_delay_ms: 10,
    });
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result: Result<(), Failure> = retry
        .execute(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Failure::http(Some(401), "expired"))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn observer_sees_every_failed_attempt() {
    let retry = Retry::new(RetryConfig {
        max_retries: 2,
        base_delay_ms: 5,
    });
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let _: Result<(), Failure> = retry
        .execute_with(
            || async { Err(Failure::http(Some(500), "down")) },
            move |classified, attempt| {
                if let Ok(mut entries) = sink.lock() {
                    entries.push((classified.kind.as_str(), attempt));
                }
            },
        )
        .await;

    let entries = seen.lock().unwrap();
    assert_eq!(
        entries.as_slice(),
        &[("server", 0), ("server", 1), ("server", 2)]
    );
}

#[tokio::test]
async fn cancel_handle_shared_across_tasks() {
    let retry = Arc::new(Retry::new(RetryConfig {
        max_retries: 10,
        base_delay_ms: 10_000,
    }));
    let cancel = retry.cancel_handle();

    let runner = Arc::clone(&retry);
    let worker = tokio::spawn(async move {
        let result: Result<(), Failure> = runner
            .execute(|| async { Err(Failure::http(None, "unreachable")) })
            .await;
        result
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();

    let result = worker.await.unwrap();
    assert!(result.is_err());
    assert!(cancel.is_cancelled());
}

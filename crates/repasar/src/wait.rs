//! Readiness polling.
//!
//! Every "wait for the UI to settle" in the walkthrough is a bounded poll for a
//! concrete condition rather than a fixed-duration sleep. The poll interval and
//! timeout are carried in [`WaitOptions`].

use crate::result::{RepasarError, RepasarResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for element readiness (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for readiness polls
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Outcome of a successful readiness poll
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a wait result
    #[must_use]
    pub fn new(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

/// Poll an async condition until it holds or the timeout expires.
///
/// The condition is re-checked every `poll_interval`; a condition error
/// propagates immediately.
pub async fn poll_until<F, Fut>(
    mut check: F,
    waiting_for: &str,
    options: &WaitOptions,
) -> RepasarResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RepasarResult<bool>>,
{
    let start = Instant::now();
    loop {
        if check().await? {
            return Ok(WaitResult::new(start.elapsed(), waiting_for));
        }
        if start.elapsed() >= options.timeout() {
            return Err(RepasarError::Timeout {
                ms: options.timeout_ms,
                waiting_for: waiting_for.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn wait_options_default() {
        let opts = WaitOptions::default();
        assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn wait_options_chained() {
        let opts = WaitOptions::new().with_timeout(2_000).with_poll_interval(10);
        assert_eq!(opts.timeout_ms, 2_000);
        assert_eq!(opts.poll_interval_ms, 10);
        assert_eq!(opts.timeout(), Duration::from_millis(2_000));
        assert_eq!(opts.poll_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn poll_until_immediate_success() {
        let opts = WaitOptions::new().with_timeout(100);
        let result = poll_until(|| async { Ok(true) }, "always ready", &opts).await;
        let result = result.unwrap();
        assert_eq!(result.waited_for, "always ready");
    }

    #[tokio::test]
    async fn poll_until_eventually_succeeds() {
        let calls = AtomicU32::new(0);
        let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(5);
        let result = poll_until(
            || async { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 3) },
            "third poll",
            &opts,
        )
        .await;
        assert!(result.is_ok());
        assert!(calls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn poll_until_times_out() {
        let opts = WaitOptions::new().with_timeout(50).with_poll_interval(5);
        let result = poll_until(|| async { Ok(false) }, "never ready", &opts).await;
        match result {
            Err(RepasarError::Timeout { ms, waiting_for }) => {
                assert_eq!(ms, 50);
                assert_eq!(waiting_for, "never ready");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn poll_until_propagates_condition_errors() {
        let opts = WaitOptions::new().with_timeout(100);
        let result = poll_until(
            || async {
                Err(RepasarError::Evaluation {
                    message: "boom".into(),
                })
            },
            "broken condition",
            &opts,
        )
        .await;
        assert!(matches!(result, Err(RepasarError::Evaluation { .. })));
    }
}

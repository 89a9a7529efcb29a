//! Retry with exponential backoff for idempotent remote reads.

use std::thread;
use std::time::Duration;

/// How many times to try a read, and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based): base, 2×base, 4×base, …
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, `retryable` rejects the error, or attempts
    /// run out. `on_retry` sees each error that is about to be retried.
    pub fn run<T, E>(
        &self,
        mut op: impl FnMut() -> Result<T, E>,
        retryable: impl Fn(&E) -> bool,
        mut on_retry: impl FnMut(u32, &E),
    ) -> Result<T, E> {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts && retryable(&e) => {
                    on_retry(attempt, &e);
                    thread::sleep(self.delay_for(attempt));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn delays_double() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(1), Duration::from_millis(500));
        assert_eq!(p.delay_for(2), Duration::from_millis(1000));
        assert_eq!(p.delay_for(3), Duration::from_millis(2000));
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let mut retried = Vec::new();
        let result: Result<u32, &str> = instant(3).run(
            || {
                calls += 1;
                if calls < 3 { Err("flaky") } else { Ok(calls) }
            },
            |_| true,
            |n, _| retried.push(n),
        );
        assert_eq!(result, Ok(3));
        assert_eq!(retried, vec![1, 2]);
    }

    #[test]
    fn gives_up_after_last_attempt() {
        let mut calls = 0;
        let result: Result<(), &str> = instant(3).run(
            || {
                calls += 1;
                Err("down")
            },
            |_| true,
            |_, _| {},
        );
        assert_eq!(result, Err("down"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn non_retryable_errors_return_immediately() {
        let mut calls = 0;
        let result: Result<(), &str> = instant(5).run(
            || {
                calls += 1;
                Err("unauthorized")
            },
            |e| *e != "unauthorized",
            |_, _| {},
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}

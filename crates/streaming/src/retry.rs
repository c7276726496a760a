use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Bounded retry with exponential backoff.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff
            .mul_f64(self.multiplier.powi(retry as i32))
    }

    /// Runs `op` until it succeeds or the attempts are used up; returns the
    /// last error.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(err) if attempt + 1 < attempts => {
                    let delay = self.backoff(attempt);
                    debug!(attempt, ?delay, error = %err, "retrying");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;
    use std::cell::Cell;
    use std::time::Duration;

    #[test]
    fn backoff_doubles() {
        let p = RetryPolicy::default();
        assert_eq!(p.backoff(0), Duration::from_millis(250));
        assert_eq!(p.backoff(2), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let out: Result<(), String> = RetryPolicy::immediate(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err("boom".to_string()) }
            })
            .await;
        assert_eq!(out, Err("boom".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let calls = Cell::new(0);
        let out: Result<u32, String> = RetryPolicy::immediate(5)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { if n == 2 { Ok(n) } else { Err("again".into()) } }
            })
            .await;
        assert_eq!(out, Ok(2));
        assert_eq!(calls.get(), 2);
    }
}

//! Bounded retries with exponential backoff for transient storage faults.
//!
//! Only errors that report themselves as [`Transient`] are retried. Business outcomes (sold out, fully redeemed,
//! malformed token, ...) are never errors at this level, so they can never be retried by accident.
use std::{fmt::Display, future::Future, time::Duration};

use log::*;
use tokio::time::sleep;

/// Errors that may succeed if the same operation is attempted again.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry. Each subsequent retry doubles it.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(25), max_delay: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay, ..Default::default() }
    }

    pub fn no_retries() -> Self {
        Self { max_attempts: 1, ..Default::default() }
    }

    /// The delay to wait after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the policy's attempts are used up.
pub async fn retry_transient<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    "🔁️ {label} failed with a transient error on attempt {attempt}/{max_attempts}. Retrying in {}ms. \
                     {e}",
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            },
            Err(e) => {
                if e.is_transient() {
                    error!("🔁️ {label} failed after {attempt} attempts. Giving up. {e}");
                }
                return Err(e);
            },
            ok => return ok,
        }
    }
}

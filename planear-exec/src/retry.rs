//! Retry with exponential backoff.

use crate::error::RetryError;
use planear_types::OperationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times an operation is attempted and how long to wait between
/// attempts.
///
/// The wait after failed attempt `n` is `base_delay_ms * multiplier^(n-1)`.
/// There is no wait after the final attempt and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero behaves as one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            multiplier: 1,
        }
    }

    /// Effective number of attempts.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Backoff after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier).saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Runs `op` until it succeeds or the attempts are used up, sleeping on
    /// the current thread between attempts.
    ///
    /// Every failed attempt is logged at WARN with the operation kind,
    /// subject, attempt number and error.
    pub fn run<E, F>(&self, kind: OperationKind, subject: &str, mut op: F) -> Result<(), RetryError>
    where
        E: fmt::Display,
        F: FnMut() -> Result<(), E>,
    {
        let attempts = self.attempts();
        for attempt in 1..=attempts {
            match op() {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(kind = %kind, subject = %subject, attempt, "operation succeeded after retry");
                    }
                    return Ok(());
                }
                Err(err) => {
                    let message = format!("{err:#}");
                    warn!(
                        kind = %kind,
                        subject = %subject,
                        attempt,
                        max_attempts = attempts,
                        error = %message,
                        "operation attempt failed"
                    );
                    if attempt < attempts {
                        thread::sleep(self.delay_for(attempt));
                    }
                }
            }
        }
        Err(RetryError::Exhausted { kind, attempts })
    }
}

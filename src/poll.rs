//! Bounded synchronous polling.
//!
//! Every wait in the harness is attempt-bounded: a condition that never
//! holds ends in [`PollOutcome::TimedOut`] instead of an endless loop.
//! Errors from the condition are not retried.

use std::time::Duration;

use chainsim_types::HarnessError;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    TimedOut { attempts: usize },
}

impl<T> PollOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            PollOutcome::Ready(value) => Some(value),
            PollOutcome::TimedOut { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: usize,
    /// Pause after each unsuccessful attempt.
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: usize, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Call `condition(attempt)` until it yields a value or the attempts run out.
///
/// `condition` may have side effects such as producing blocks; it is called
/// at most `policy.max_attempts` times.
pub fn poll_until<T, F>(
    description: &str,
    policy: PollPolicy,
    mut condition: F,
) -> Result<PollOutcome<T>, HarnessError>
where
    F: FnMut(usize) -> Result<Option<T>, HarnessError>,
{
    for attempt in 0..policy.max_attempts {
        if let Some(value) = condition(attempt)? {
            debug!(what = description, attempt, "condition met");
            return Ok(PollOutcome::Ready(value));
        }
        if attempt + 1 < policy.max_attempts && !policy.interval.is_zero() {
            std::thread::sleep(policy.interval);
        }
    }
    info!(what = description, attempts = policy.max_attempts, "gave up waiting");
    Ok(PollOutcome::TimedOut {
        attempts: policy.max_attempts,
    })
}

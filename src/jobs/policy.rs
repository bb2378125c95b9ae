use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the next poll.
///
/// `attempt` is the 1-based number of the poll that just completed without reaching a terminal
/// status. Implementations must be deterministic for a given attempt.
pub trait Backoff: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

/// Constant delay between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    pub interval: Duration,
}

impl Backoff for FixedBackoff {
    fn next_delay(&self, _attempt: u32) -> Duration {
        self.interval
    }
}

/// `initial * 2^(attempt-1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1);
        let factor = 1u32.checked_shl(shift).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

/// Bounds for [`crate::PaperApiClient::poll_until_terminal`].
///
/// The worst-case wait is the sum of the first `max_attempts - 1` backoff delays.
#[derive(Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub backoff: Arc<dyn Backoff>,
}

impl PollPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(max_attempts: u32, backoff: impl Backoff + 'static) -> Self {
        Self {
            max_attempts,
            backoff: Arc::new(backoff),
        }
    }

    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self::new(max_attempts, FixedBackoff { interval })
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::validation_with_context(
                "PollPolicy.max_attempts must be at least 1",
                ErrorContext::new()
                    .with_field_path("policy.max_attempts")
                    .with_source("poll_policy"),
            ));
        }
        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_INTERVAL)
    }
}

impl fmt::Debug for PollPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("first_delay", &self.backoff.next_delay(1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_backoff_is_constant() {
        let b = FixedBackoff {
            interval: Duration::from_millis(250),
        };
        assert_eq!(b.next_delay(1), Duration::from_millis(250));
        assert_eq!(b.next_delay(40), Duration::from_millis(250));
    }

    #[test]
    fn exponential_backoff_doubles_until_cap() {
        let b = ExponentialBackoff {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
        };
        let delays: Vec<u128> = (1..=6).map(|a| b.next_delay(a).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1000, 1000]);
        assert_eq!(b.next_delay(200), Duration::from_secs(1));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        assert!(PollPolicy::fixed(0, Duration::ZERO).validate().is_err());
        assert!(PollPolicy::default().validate().is_ok());
        assert_eq!(PollPolicy::default().max_attempts, 30);
    }
}

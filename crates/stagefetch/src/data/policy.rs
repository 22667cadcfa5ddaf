use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{FetchError, Result};

/// How many times one endpoint is tried and how long to wait in between.
///
/// The same policy applies to every endpoint of a fetch and is never
/// changed while the fetch runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    sleep_between_attempts: Duration,
}

impl RetryPolicy {
    /// Build a policy. Zero attempts is rejected with [`FetchError::InvalidPolicy`].
    ///
    /// ```
    /// use stagefetch::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_secs(1)).unwrap();
    /// assert_eq!(policy.max_attempts(), 3);
    /// assert!(RetryPolicy::new(0, Duration::ZERO).is_err());
    /// ```
    pub fn new(max_attempts: u32, sleep_between_attempts: Duration) -> Result<Self> {
        let max_attempts = NonZeroU32::new(max_attempts).ok_or_else(|| {
            FetchError::InvalidPolicy("max_attempts must be at least 1".to_string())
        })?;
        Ok(Self {
            max_attempts,
            sleep_between_attempts,
        })
    }

    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self {
            max_attempts: NonZeroU32::MIN,
            sleep_between_attempts: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    pub fn sleep_between_attempts(&self) -> Duration {
        self.sleep_between_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN),
            sleep_between_attempts: Duration::from_secs(1),
        }
    }
}

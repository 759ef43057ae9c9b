use std::time::Duration;

pub const MAX_UPLOAD_RETRIES: u32 = 10;

pub const MAX_DELAY_BETWEEN_RETRIES: Duration = Duration::from_secs(20);

/// Bounded retries with an exponential, capped backoff. Applies the same way
/// to chunk sends and to size probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_UPLOAD_RETRIES,
            max_delay: MAX_DELAY_BETWEEN_RETRIES,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            max_delay: MAX_DELAY_BETWEEN_RETRIES,
        }
    }

    /// `retries` is the number of retries already spent on the current file.
    #[must_use]
    pub const fn should_retry(&self, retries: u32) -> bool {
        retries < self.max_retries
    }

    /// Delay before retry number `attempt`: `min(2^attempt, max_delay)` seconds.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        // 2^5 already exceeds the default cap, avoid overflowing the shift
        let secs = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_secs(secs).min(self.max_delay)
    }
}

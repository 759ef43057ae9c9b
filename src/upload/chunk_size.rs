use std::time::Duration;

// 50MB
pub const INITIAL_CHUNK_SIZE: u64 = 1_000 * 1_000 * 50;

// 500MB
pub const MAX_CHUNK_SIZE: u64 = 500 * 1_000 * 1_000;

// each chunk should take about a minute to upload
pub const IDEAL_CHUNK_DURATION: Duration = Duration::from_secs(60);

/// Adapts the chunk size to the observed throughput so that every chunk takes
/// roughly `ideal` wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSizer {
    pub ideal: Duration,
    pub max: u64,
}

impl Default for ChunkSizer {
    fn default() -> Self {
        Self {
            ideal: IDEAL_CHUNK_DURATION,
            max: MAX_CHUNK_SIZE,
        }
    }
}

impl ChunkSizer {
    #[must_use]
    pub const fn new(ideal: Duration, max: u64) -> Self {
        Self { ideal, max }
    }

    /// Returns the size for the next chunk given how long the last one took.
    ///
    /// The result is capped at `max` and never drops below one byte, a zero
    /// sized chunk could never advance the upload.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn next(&self, elapsed: Duration, current: u64) -> u64 {
        if elapsed.is_zero() {
            return self.max;
        }

        let factor = self.ideal.as_secs_f64() / elapsed.as_secs_f64();
        let size = (current as f64 * factor).round();

        if size >= self.max as f64 {
            self.max
        } else {
            (size as u64).max(1)
        }
    }
}

use crate::skp::ReservationResponse;
use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

/// Receives the upload lifecycle events.
pub trait UploadObserver: Send + Sync {
    /// Percentage complete across all files, 0..=100, never decreasing.
    fn progress(&self, percent: u8);

    fn reservation_created(&self, _reservation: &ReservationResponse) {}

    fn reservation_confirm(&self) {}
}

// quiet
impl UploadObserver for () {
    fn progress(&self, _percent: u8) {}
}

/// Turns byte counts into percentages and forwards them to the observer,
/// dropping anything lower than what was already reported.
pub struct Progress {
    total: u64,
    last: AtomicU8,
    observer: Arc<dyn UploadObserver>,
}

impl Progress {
    #[must_use]
    pub fn new(total: u64, observer: Arc<dyn UploadObserver>) -> Self {
        Self {
            total,
            last: AtomicU8::new(0),
            observer,
        }
    }

    pub fn start(&self) {
        self.last.store(0, Ordering::Relaxed);
        self.observer.progress(0);
    }

    pub fn update(&self, uploaded: u64) {
        let percent = percent(uploaded, self.total);
        let previous = self.last.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            self.observer.progress(percent);
        }
    }

    #[must_use]
    pub fn observer(&self) -> &dyn UploadObserver {
        self.observer.as_ref()
    }
}

/// `floor(uploaded / total * 100)` capped at 100, an empty transfer is complete.
#[must_use]
pub fn percent(uploaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }

    let percent = (u128::from(uploaded) * 100 / u128::from(total)).min(100);

    u8::try_from(percent).unwrap_or(100)
}

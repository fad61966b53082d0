use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Millisecond timestamps for upload names.
///
/// Stamps are strictly increasing for the lifetime of the clock, so two uploads
/// landing in the same millisecond still get distinct names.
#[derive(Debug, Default)]
pub struct UploadClock {
    last: AtomicI64,
}

impl UploadClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

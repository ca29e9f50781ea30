use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Time-based identifiers: decimal nanoseconds since the Unix epoch.
///
/// Sortable and strictly increasing within one generator, but not unique
/// across processes or machines.
#[derive(Debug, Default)]
pub struct TimeIdGenerator {
    last: AtomicI64,
}

impl TimeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_with(|| Utc::now().timestamp_nanos_opt()).to_string()
    }

    // If the clock has not moved past the last issued value, bump by one.
    fn next_with<F>(&self, now: F) -> i64
    where
        F: Fn() -> Option<i64>,
    {
        let mut issued = 0;
        let updated = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = match now() {
                    Some(nanos) if nanos > last => nanos,
                    _ => last.saturating_add(1),
                };
                Some(issued)
            });
        // The closure never returns `None`, so the update cannot be rejected.
        debug_assert!(updated.is_ok());
        issued
    }
}

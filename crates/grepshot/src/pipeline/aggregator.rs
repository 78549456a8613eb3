use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::warn;

/// Snapshot of all successful extractions, keyed by file path.
pub type ResultSnapshot = HashMap<String, String>;

/// Thread-safe accumulator for successful OCR results.
///
/// Workers borrow it for the duration of a dispatch and call
/// [`record`](Self::record). [`into_snapshot`](Self::into_snapshot) takes it
/// by value, so a snapshot can only be taken once every borrow has ended.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    entries: Mutex<ResultSnapshot>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, path: impl Into<String>, text: impl Into<String>) {
        let path = path.into();
        if let Some(previous) = self.lock().insert(path.clone(), text.into()) {
            // Keys come from distinct candidates; a repeat means the queue
            // delivered a path twice.
            warn!(
                "Result for {} recorded twice (previous text had {} chars)",
                path,
                previous.len()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_snapshot(self) -> ResultSnapshot {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // A worker panicking mid-insert leaves the map itself intact.
    fn lock(&self) -> MutexGuard<'_, ResultSnapshot> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Result aggregator lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

use std::future::Future;
use std::sync::{Arc, OnceLock};

use crate::error::QuizError;

/// Process-wide snapshot that is loaded on first use and never changes afterwards.
///
/// Two callers arriving before the first load finishes may both run the loader;
/// the first one to finish is kept and both get that snapshot back.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    slot: OnceLock<Arc<T>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().cloned()
    }

    /// Failed loads leave the cache empty, so the next call tries again.
    pub async fn get_or_load<F>(&self, load: F) -> Result<Arc<T>, QuizError>
    where
        F: Future<Output = Result<T, QuizError>>,
    {
        if let Some(snapshot) = self.get() {
            return Ok(snapshot);
        }

        let loaded = Arc::new(load.await?);
        let _ = self.slot.set(loaded.clone());
        Ok(self.get().unwrap_or(loaded))
    }
}

//! Append-only result log shared by the runner and anything it spawns.
//!
//! Appends take a `tokio::sync::Mutex`, so concurrent writers never
//! interleave and no result is lost. Entries are never mutated or removed.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::report::{format_result_line, ProbeResult};

#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    entries: Arc<Mutex<Vec<ProbeResult>>>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and echo it to the console while the lock is held,
    /// keeping console order identical to log order.
    pub async fn append(&self, result: ProbeResult) {
        let mut entries = self.entries.lock().await;
        println!("{}", format_result_line(&result));
        entries.push(result);
    }

    pub async fn snapshot(&self) -> Vec<ProbeResult> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn failure_count(&self) -> usize {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|r| !r.passed())
            .count()
    }
}

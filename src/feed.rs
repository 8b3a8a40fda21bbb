//! Sentiment feed with stale-response cancellation
//!
//! Sentiment fetches race: changing the username (or refreshing the listing)
//! while a request is in flight supersedes it. Each refresh stamps a
//! generation; a response only lands if its generation is still the latest.
//! Superseded responses are discarded silently, never surfaced as errors.

use crate::gateway::Gateway;
use crate::types::SentimentRow;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Holder of the most recent sentiment rows
pub struct SentimentFeed {
    gateway: Arc<dyn Gateway>,
    generation: AtomicU64,
    rows: RwLock<Vec<SentimentRow>>,
    error: RwLock<Option<String>>,
}

impl SentimentFeed {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            generation: AtomicU64::new(0),
            rows: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    /// Refresh the full sentiment listing
    pub async fn refresh(&self) {
        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.gateway.fetch_sentiment().await;
        self.apply(my_gen, result.map(|raw| raw.into_iter().map(|r| r.into_row()).collect()));
    }

    /// Refresh with only one author's rows
    pub async fn refresh_for(&self, username: &str) {
        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.gateway.fetch_sentiment_for(username).await;
        self.apply(my_gen, result.map(|raw| raw.into_iter().map(|r| r.into_row()).collect()));
    }

    /// Snapshot of the current rows, in server order
    pub fn rows(&self) -> Vec<SentimentRow> {
        self.rows.read().clone()
    }

    /// Last fetch failure, if the latest refresh failed
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    fn apply(
        &self,
        my_gen: u64,
        result: Result<Vec<SentimentRow>, crate::gateway::GatewayError>,
    ) {
        if self.generation.load(Ordering::SeqCst) != my_gen {
            // A newer refresh superseded this one; cancellation is not an error
            debug!(generation = my_gen, "Discarding stale sentiment response");
            return;
        }
        match result {
            Ok(rows) => {
                debug!(count = rows.len(), "Sentiment rows refreshed");
                *self.rows.write() = rows;
                *self.error.write() = None;
            }
            Err(err) => {
                warn!(error = %err, "Sentiment refresh failed");
                *self.error.write() = Some(err.to_string());
            }
        }
    }
}

//! Shared scriptable gateway mock for integration tests

use async_trait::async_trait;
use parking_lot::Mutex;
use sentiment_client::gateway::{BatchPicturesResponse, Gateway, GatewayError};
use sentiment_client::types::{RawSentimentRow, WatchlistEntry, WatchlistKind};
use std::collections::VecDeque;
use std::time::Duration;

/// In-memory gateway with scriptable mutation outcomes
///
/// Mutation outcomes are popped from a queue in call order; an empty queue
/// means success. Every call is recorded so tests can assert on the exact
/// request sequence the store issued.
pub struct MockGateway {
    /// Entries served by `fetch_watchlist`, one response per call (last wins)
    pub loads: Mutex<VecDeque<Vec<WatchlistEntry>>>,

    /// Scripted outcomes for add/remove, popped per call
    pub mutation_outcomes: Mutex<VecDeque<Result<(), GatewayError>>>,

    /// Recorded calls, e.g. `add:user:bob`
    pub calls: Mutex<Vec<String>>,

    /// Artificial latency applied to every mutation
    pub mutation_delay: Duration,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Self {
        Self {
            loads: Mutex::new(VecDeque::new()),
            mutation_outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            mutation_delay: Duration::ZERO,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            mutation_delay: delay,
            ..Self::new()
        }
    }

    pub fn queue_load(&self, entries: Vec<WatchlistEntry>) {
        self.loads.lock().push_back(entries);
    }

    pub fn queue_outcome(&self, outcome: Result<(), GatewayError>) {
        self.mutation_outcomes.lock().push_back(outcome);
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn next_outcome(&self) -> Result<(), GatewayError> {
        self.mutation_outcomes.lock().pop_front().unwrap_or(Ok(()))
    }

    pub fn entry(kind: WatchlistKind, item_id: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: format!("id-{item_id}"),
            kind,
            item_id: item_id.to_string(),
            added_at: None,
        }
    }

    pub fn server_error() -> GatewayError {
        GatewayError::Status {
            code: 500,
            endpoint: "watchlist",
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_watchlist(&self, principal: &str) -> Result<Vec<WatchlistEntry>, GatewayError> {
        self.calls.lock().push(format!("load:{principal}"));
        match self.loads.lock().pop_front() {
            Some(entries) => Ok(entries),
            None => Ok(vec![]),
        }
    }

    async fn add_watchlist(
        &self,
        _principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError> {
        if !self.mutation_delay.is_zero() {
            tokio::time::sleep(self.mutation_delay).await;
        }
        self.calls.lock().push(format!("add:{kind}:{item_id}"));
        self.next_outcome()
    }

    async fn remove_watchlist(
        &self,
        _principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError> {
        if !self.mutation_delay.is_zero() {
            tokio::time::sleep(self.mutation_delay).await;
        }
        self.calls.lock().push(format!("remove:{kind}:{item_id}"));
        self.next_outcome()
    }

    async fn batch_profile_pictures(
        &self,
        usernames: &[String],
    ) -> Result<BatchPicturesResponse, GatewayError> {
        self.calls.lock().push(format!("batch:{}", usernames.len()));
        Ok(BatchPicturesResponse {
            data: Default::default(),
            stats: None,
        })
    }

    async fn fetch_sentiment(&self) -> Result<Vec<RawSentimentRow>, GatewayError> {
        Ok(vec![])
    }

    async fn fetch_sentiment_for(&self, _: &str) -> Result<Vec<RawSentimentRow>, GatewayError> {
        Ok(vec![])
    }

    async fn warm_url(&self, url: &str) -> Result<(), GatewayError> {
        self.calls.lock().push(format!("warm:{url}"));
        Ok(())
    }
}

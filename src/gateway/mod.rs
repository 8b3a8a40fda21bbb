//! Remote gateway client
//!
//! Thin typed client over the backend REST endpoints the data layer consumes:
//! watchlist CRUD, the batched profile-picture resolver, and the sentiment
//! listing. The `Gateway` trait is the seam the stores and feeds are written
//! against; `HttpGateway` is the production implementation.

mod errors;
mod http;

pub use errors::GatewayError;
pub use http::HttpGateway;

use crate::types::{RawSentimentRow, WatchlistEntry, WatchlistKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Per-username payload of the batch profile-picture endpoint
///
/// `profile_image_url` is absent when the upstream has no resolvable picture
/// for the username; that is not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePicture {
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Response body of `POST /profile-pictures/batch`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPicturesResponse {
    /// Usernames the server could resolve; absentees mean "no avatar"
    #[serde(default)]
    pub data: HashMap<String, ProfilePicture>,

    /// Optional upstream call accounting, logged for diagnostics only
    #[serde(default)]
    pub stats: Option<BatchStats>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchStats {
    pub api_calls: u32,
}

/// Interface to the backend services consumed by the data layer
///
/// All methods suspend at their network request; none of them blocks the
/// runtime. Implementations must not retry on their own: every retry in this
/// system is user-initiated.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch every watchlist entry belonging to `principal`
    async fn fetch_watchlist(&self, principal: &str) -> Result<Vec<WatchlistEntry>, GatewayError>;

    /// Create a watchlist entry; success means the server has persisted it
    async fn add_watchlist(
        &self,
        principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError>;

    /// Delete a watchlist entry; success means the server no longer has it
    async fn remove_watchlist(
        &self,
        principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError>;

    /// Resolve avatar URLs for a set of usernames in a single request
    async fn batch_profile_pictures(
        &self,
        usernames: &[String],
    ) -> Result<BatchPicturesResponse, GatewayError>;

    /// Fetch the full sentiment listing
    async fn fetch_sentiment(&self) -> Result<Vec<RawSentimentRow>, GatewayError>;

    /// Fetch the sentiment rows of a single author
    async fn fetch_sentiment_for(
        &self,
        username: &str,
    ) -> Result<Vec<RawSentimentRow>, GatewayError>;

    /// Issue a plain GET against an avatar URL to warm the HTTP cache
    ///
    /// The body is discarded; only the transport outcome is reported.
    async fn warm_url(&self, url: &str) -> Result<(), GatewayError>;
}

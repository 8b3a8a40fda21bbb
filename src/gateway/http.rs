//! Production `Gateway` implementation over reqwest

use super::errors::GatewayError;
use super::{BatchPicturesResponse, Gateway};
use crate::types::{RawSentimentRow, WatchlistEntry, WatchlistKind};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Request body for `POST /watchlist` and `DELETE /watchlist`
#[derive(Debug, Serialize)]
struct WatchlistMutation<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "type")]
    kind: WatchlistKind,
    #[serde(rename = "itemId")]
    item_id: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchPicturesRequest<'a> {
    usernames: &'a [String],
}

/// HTTP client for the backend API
///
/// Holds a pooled reqwest client, the API base URL, and the bearer token
/// handed over by the (external) auth layer. Token refresh is not this
/// component's job; an expired token simply fails the request.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    /// Build a gateway against `base_url` with the given request timeout
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn token(&self) -> Result<&str, GatewayError> {
        self.token.as_deref().ok_or(GatewayError::MissingToken)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check status, mapping non-success to a labeled error
    fn check(
        response: reqwest::Response,
        endpoint: &'static str,
    ) -> Result<reqwest::Response, GatewayError> {
        let code = response.status().as_u16();
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Status { code, endpoint })
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_watchlist(&self, principal: &str) -> Result<Vec<WatchlistEntry>, GatewayError> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, principal = %principal, "Fetching watchlist");

        let response = self
            .client
            .get(self.url(&format!("/watchlist/{}", principal)))
            .bearer_auth(self.token()?)
            .send()
            .await?;
        let response = Self::check(response, "watchlist")?;

        let entries: Vec<WatchlistEntry> = response
            .json()
            .await
            .map_err(|_| GatewayError::Decode { endpoint: "watchlist" })?;
        debug!(request_id = %request_id, count = entries.len(), "Watchlist fetched");
        Ok(entries)
    }

    async fn add_watchlist(
        &self,
        principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, kind = %kind, item_id = %item_id, "Adding watchlist entry");

        let response = self
            .client
            .post(self.url("/watchlist"))
            .bearer_auth(self.token()?)
            .json(&WatchlistMutation {
                user_id: principal,
                kind,
                item_id,
            })
            .send()
            .await?;
        Self::check(response, "watchlist add")?;
        Ok(())
    }

    async fn remove_watchlist(
        &self,
        principal: &str,
        kind: WatchlistKind,
        item_id: &str,
    ) -> Result<(), GatewayError> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, kind = %kind, item_id = %item_id, "Removing watchlist entry");

        let response = self
            .client
            .delete(self.url("/watchlist"))
            .bearer_auth(self.token()?)
            .json(&WatchlistMutation {
                user_id: principal,
                kind,
                item_id,
            })
            .send()
            .await?;
        Self::check(response, "watchlist remove")?;
        Ok(())
    }

    async fn batch_profile_pictures(
        &self,
        usernames: &[String],
    ) -> Result<BatchPicturesResponse, GatewayError> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, count = usernames.len(), "Resolving profile pictures");

        let response = self
            .client
            .post(self.url("/profile-pictures/batch"))
            .bearer_auth(self.token()?)
            .json(&BatchPicturesRequest { usernames })
            .send()
            .await?;
        let response = Self::check(response, "profile-pictures")?;

        let batch: BatchPicturesResponse = response
            .json()
            .await
            .map_err(|_| GatewayError::Decode { endpoint: "profile-pictures" })?;
        if let Some(stats) = batch.stats {
            debug!(request_id = %request_id, api_calls = stats.api_calls, "Batch resolver stats");
        }
        Ok(batch)
    }

    async fn fetch_sentiment(&self) -> Result<Vec<RawSentimentRow>, GatewayError> {
        let response = self
            .client
            .get(self.url("/usersentiment"))
            .bearer_auth(self.token()?)
            .send()
            .await?;
        let response = Self::check(response, "usersentiment")?;
        response
            .json()
            .await
            .map_err(|_| GatewayError::Decode { endpoint: "usersentiment" })
    }

    async fn fetch_sentiment_for(
        &self,
        username: &str,
    ) -> Result<Vec<RawSentimentRow>, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/usersentiment/{}", username)))
            .bearer_auth(self.token()?)
            .send()
            .await?;
        let response = Self::check(response, "usersentiment")?;
        response
            .json()
            .await
            .map_err(|_| GatewayError::Decode { endpoint: "usersentiment" })
    }

    async fn warm_url(&self, url: &str) -> Result<(), GatewayError> {
        // No bearer token: avatar URLs point at public CDNs, not our API
        let response = self.client.get(url).send().await?;
        Self::check(response, "avatar")?;
        Ok(())
    }
}

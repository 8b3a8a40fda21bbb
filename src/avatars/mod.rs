//! Batched, de-duplicated avatar resolution and cache warming
//!
//! One request resolves every username on a data load; a fire-and-forget
//! warming pass then touches the URLs of the current and next page so the
//! HTTP cache is hot before the user navigates forward. Avatars are
//! decorative: nothing here may ever fail the data path.

use crate::gateway::Gateway;
use crate::pipeline::paging;
use crate::types::SentimentRow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Username -> avatar URL, rebuilt wholesale per data load
///
/// Never partially invalidated; the HTTP cache owns freshness.
pub type AvatarCache = HashMap<String, String>;

/// Stateless avatar pipeline over the gateway's batch resolver
///
/// Safe to call concurrently with disjoint inputs; the caller sequences
/// `fetch_batch` before `preload_window` for a given load cycle.
pub struct ImagePrefetcher {
    gateway: Arc<dyn Gateway>,
}

impl ImagePrefetcher {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Resolve avatar URLs for `usernames` in a single request
    ///
    /// An empty input short-circuits to an empty map without touching the
    /// network. Any failure degrades to an empty map with a diagnostic;
    /// usernames absent from the response simply have no avatar.
    pub async fn fetch_batch(&self, usernames: &[String]) -> AvatarCache {
        if usernames.is_empty() {
            return AvatarCache::new();
        }

        match self.gateway.batch_profile_pictures(usernames).await {
            Ok(batch) => {
                let cache: AvatarCache = batch
                    .data
                    .into_iter()
                    .filter_map(|(user, pic)| pic.profile_image_url.map(|url| (user, url)))
                    .collect();
                debug!(
                    requested = usernames.len(),
                    resolved = cache.len(),
                    "Avatar batch resolved"
                );
                cache
            }
            Err(err) => {
                warn!(error = %err, count = usernames.len(), "Avatar batch failed, degrading to placeholders");
                AvatarCache::new()
            }
        }
    }

    /// Warm the HTTP cache for the avatars of pages `page` and `page + 1`
    ///
    /// Every URL in the window gets a detached GET whose outcome is logged
    /// and otherwise ignored. Rows without a cached URL are skipped. Returns
    /// immediately; nothing awaits the warming tasks.
    pub fn preload_window(
        &self,
        cache: &AvatarCache,
        rows: &[SentimentRow],
        page: usize,
        page_size: usize,
    ) {
        let range = paging::prefetch_range(page, page_size, rows.len());
        for row in &rows[range] {
            let Some(url) = cache.get(&row.username) else {
                continue;
            };
            let gateway = Arc::clone(&self.gateway);
            let url = url.clone();
            let username = row.username.clone();
            tokio::spawn(async move {
                match gateway.warm_url(&url).await {
                    Ok(()) => debug!(username = %username, "Avatar warmed"),
                    Err(err) => debug!(username = %username, error = %err, "Avatar warm failed"),
                }
            });
        }
    }
}

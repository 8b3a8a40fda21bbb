//! Client data layer for the crypto-sentiment dashboard
//!
//! This library exposes the data-consistency core that sits between a UI and
//! the backend services: the watchlist synchronization store, the batched
//! avatar prefetcher, the deterministic search/filter/sort pipeline, and the
//! pagination window glue.

pub mod avatars;
pub mod config;
pub mod feed;
pub mod gateway;
pub mod pipeline;
pub mod types;
pub mod watchlist;

// Re-export commonly used types
pub use avatars::{AvatarCache, ImagePrefetcher};
pub use feed::SentimentFeed;
pub use gateway::{Gateway, GatewayError, HttpGateway};
pub use types::{FilterState, SentimentRow, Timeframe, WatchlistEntry, WatchlistKind};
pub use watchlist::WatchlistStore;

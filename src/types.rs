//! Core data types shared across the client data layer
//!
//! These mirror the wire shapes consumed from the backend services plus the
//! pure value objects the pipeline operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Collection a watchlist entry belongs to
///
/// The store keeps one independent membership set per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistKind {
    /// Crypto symbols (e.g. "BTC")
    Crypto,
    /// User handles
    User,
}

impl std::fmt::Display for WatchlistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crypto => write!(f, "crypto"),
            Self::User => write!(f, "user"),
        }
    }
}

/// One persisted watchlist entry as returned by `GET /watchlist/{userId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Server-assigned entry id
    pub id: String,

    /// Collection the entry belongs to
    #[serde(rename = "type")]
    pub kind: WatchlistKind,

    /// Watched item identifier (symbol or username)
    #[serde(rename = "itemId")]
    pub item_id: String,

    /// When the entry was created
    #[serde(rename = "addedAt", default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Trading-horizon bucket derived from a row's average holding period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// Intraday, held at most one day
    Day,
    /// Held up to two weeks
    Swing,
    /// Held up to a quarter
    Position,
    /// Longer than a quarter
    Macro,
}

impl Timeframe {
    /// Bucket a numeric holding period (in days) into a timeframe
    ///
    /// Thresholds: <=1 day => Day, <=14 => Swing, <=90 => Position,
    /// everything longer => Macro.
    pub fn from_days(days: f64) -> Self {
        if days <= 1.0 {
            Self::Day
        } else if days <= 14.0 {
            Self::Swing
        } else if days <= 90.0 {
            Self::Position
        } else {
            Self::Macro
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Swing => write!(f, "Swing"),
            Self::Position => write!(f, "Position"),
            Self::Macro => write!(f, "Macro"),
        }
    }
}

/// One sentiment row as consumed from `GET /usersentiment`
///
/// Immutable once fetched for a load cycle; the pipeline never mutates rows,
/// it only reorders and drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRow {
    /// Author handle, the search and watchlist key
    pub username: String,

    /// Derived trading-horizon bucket
    pub timeframe: Timeframe,

    /// Last time the row's sentiment was recomputed
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,

    /// Historical accuracy score, 0..=100
    pub accuracy: u8,
}

/// Raw sentiment row before timeframe bucketing
///
/// The backend reports the holding period as a day count; `into_row` applies
/// the bucketing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSentimentRow {
    pub username: String,

    /// Average holding period in days
    #[serde(rename = "avgHoldDays")]
    pub avg_hold_days: f64,

    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,

    pub accuracy: u8,
}

impl RawSentimentRow {
    /// Convert into a pipeline-ready row by bucketing the holding period
    pub fn into_row(self) -> SentimentRow {
        SentimentRow {
            username: self.username,
            timeframe: Timeframe::from_days(self.avg_hold_days),
            last_updated: self.last_updated,
            accuracy: self.accuracy.min(100),
        }
    }
}

/// User-selected filter state for the sentiment table
///
/// The canonical default is the identity transform: no sort, no timeframe
/// restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Stable-sort surviving rows by accuracy descending when true
    pub sort_by_accuracy: bool,

    /// Keep only rows whose timeframe is in this set; empty means all
    pub selected_timeframes: HashSet<Timeframe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_bucketing() {
        assert_eq!(Timeframe::from_days(0.2), Timeframe::Day);
        assert_eq!(Timeframe::from_days(1.0), Timeframe::Day);
        assert_eq!(Timeframe::from_days(1.1), Timeframe::Swing);
        assert_eq!(Timeframe::from_days(14.0), Timeframe::Swing);
        assert_eq!(Timeframe::from_days(30.0), Timeframe::Position);
        assert_eq!(Timeframe::from_days(90.0), Timeframe::Position);
        assert_eq!(Timeframe::from_days(365.0), Timeframe::Macro);
    }

    #[test]
    fn test_filter_state_default_is_identity_shape() {
        let state = FilterState::default();
        assert!(!state.sort_by_accuracy);
        assert!(state.selected_timeframes.is_empty());
    }

    #[test]
    fn test_raw_row_accuracy_clamped() {
        let raw = RawSentimentRow {
            username: "amy".to_string(),
            avg_hold_days: 0.5,
            last_updated: Utc::now(),
            accuracy: 250,
        };
        let row = raw.into_row();
        assert_eq!(row.accuracy, 100);
        assert_eq!(row.timeframe, Timeframe::Day);
    }

    #[test]
    fn test_watchlist_entry_wire_shape() {
        let json = r#"{"id":"e1","type":"user","itemId":"bob","addedAt":"2025-01-15T10:00:00Z"}"#;
        let entry: WatchlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, WatchlistKind::User);
        assert_eq!(entry.item_id, "bob");
        assert!(entry.added_at.is_some());
    }
}

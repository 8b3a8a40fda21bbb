//! Single source of truth for "is X watched"
//!
//! Consistency model: every mutation does its network round-trip first and
//! touches the local set only after the server has acknowledged. There is no
//! optimistic insert, so there is nothing to roll back on failure; a failed
//! mutation leaves the set exactly as it was and surfaces a message through
//! the shared error field.
//!
//! Mutations are serialized per (kind, key) through an in-flight lock map, so
//! two back-to-back toggles of the same key cannot both read the same
//! pre-mutation membership and issue duplicate or contradictory requests.

use crate::gateway::Gateway;
use crate::types::WatchlistKind;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Membership sets, view toggles and the shared error field
///
/// Guarded by one RwLock; critical sections are short and never span an await.
#[derive(Debug, Default)]
struct State {
    crypto: HashSet<String>,
    users: HashSet<String>,
    crypto_view: bool,
    user_view: bool,
    error: Option<String>,
}

impl State {
    fn set(&self, kind: WatchlistKind) -> &HashSet<String> {
        match kind {
            WatchlistKind::Crypto => &self.crypto,
            WatchlistKind::User => &self.users,
        }
    }

    fn set_mut(&mut self, kind: WatchlistKind) -> &mut HashSet<String> {
        match kind {
            WatchlistKind::Crypto => &mut self.crypto,
            WatchlistKind::User => &mut self.users,
        }
    }

    fn view(&self, kind: WatchlistKind) -> bool {
        match kind {
            WatchlistKind::Crypto => self.crypto_view,
            WatchlistKind::User => self.user_view,
        }
    }

    fn view_mut(&mut self, kind: WatchlistKind) -> &mut bool {
        match kind {
            WatchlistKind::Crypto => &mut self.crypto_view,
            WatchlistKind::User => &mut self.user_view,
        }
    }

    /// An active view over an empty set renders a permanently-empty table;
    /// force the toggle off whenever that would happen.
    fn enforce_view_invariant(&mut self, kind: WatchlistKind) {
        if self.view(kind) && self.set(kind).is_empty() {
            *self.view_mut(kind) = false;
            info!(kind = %kind, "Watchlist view disabled: set became empty");
        }
    }
}

/// Watchlist store for one principal session
///
/// Shared by handle (`Arc<WatchlistStore>`); all methods take `&self`.
pub struct WatchlistStore {
    gateway: Arc<dyn Gateway>,
    principal: RwLock<Option<String>>,
    state: RwLock<State>,

    /// Per-key serialization of in-flight mutations
    in_flight: DashMap<(WatchlistKind, String), Arc<tokio::sync::Mutex<()>>>,
}

impl WatchlistStore {
    /// Create an empty store backed by `gateway`
    ///
    /// The store is unusable for mutations until `load` has run for a
    /// principal.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            principal: RwLock::new(None),
            state: RwLock::new(State::default()),
            in_flight: DashMap::new(),
        }
    }

    /// Bulk-load all entries for `principal`, replacing both sets wholesale
    ///
    /// Idempotent: the last successful response wins. A failed load leaves
    /// the previous sets in place and surfaces the failure through the error
    /// field; it never panics or returns an error to the caller.
    pub async fn load(&self, principal: &str) {
        *self.principal.write() = Some(principal.to_string());

        match self.gateway.fetch_watchlist(principal).await {
            Ok(entries) => {
                let mut crypto = HashSet::new();
                let mut users = HashSet::new();
                for entry in entries {
                    match entry.kind {
                        WatchlistKind::Crypto => crypto.insert(entry.item_id),
                        WatchlistKind::User => users.insert(entry.item_id),
                    };
                }

                let mut state = self.state.write();
                debug!(
                    crypto = crypto.len(),
                    users = users.len(),
                    "Watchlist loaded"
                );
                state.crypto = crypto;
                state.users = users;
                state.error = None;
                state.enforce_view_invariant(WatchlistKind::Crypto);
                state.enforce_view_invariant(WatchlistKind::User);
            }
            Err(err) => {
                warn!(error = %err, "Watchlist load failed");
                self.state.write().error = Some(err.to_string());
            }
        }
    }

    /// Logout path: drop all local state
    ///
    /// The sets are disposable across sessions; the next login `load`s fresh
    /// from the server instead of trusting anything kept here.
    pub fn clear(&self) {
        *self.principal.write() = None;
        *self.state.write() = State::default();
    }

    /// Watch `key`; returns true when the server confirmed the addition
    pub async fn add(&self, kind: WatchlistKind, key: &str) -> bool {
        let _guard = self.key_lock(kind, key).await;
        self.add_locked(kind, key).await
    }

    /// Unwatch `key`; returns true when the server confirmed the removal
    pub async fn remove(&self, kind: WatchlistKind, key: &str) -> bool {
        let _guard = self.key_lock(kind, key).await;
        self.remove_locked(kind, key).await
    }

    /// Watch or unwatch `key` based on current membership
    ///
    /// Membership is read *after* the per-key lock is held, so a toggle
    /// queued behind another mutation of the same key sees the post-mutation
    /// state and cannot double-submit.
    pub async fn toggle(&self, kind: WatchlistKind, key: &str) -> bool {
        let _guard = self.key_lock(kind, key).await;
        if self.is_member(kind, key) {
            self.remove_locked(kind, key).await
        } else {
            self.add_locked(kind, key).await
        }
    }

    /// Flip the "watched only" view for one collection
    ///
    /// No-op while the membership set is empty: an empty set would make the
    /// filtered view permanently empty.
    pub fn toggle_view(&self, kind: WatchlistKind) {
        let mut state = self.state.write();
        if state.set(kind).is_empty() {
            debug!(kind = %kind, "Ignoring view toggle on empty set");
            return;
        }
        let view = state.view_mut(kind);
        *view = !*view;
    }

    /// O(1) membership query
    pub fn is_member(&self, kind: WatchlistKind, key: &str) -> bool {
        self.state.read().set(kind).contains(key)
    }

    /// Whether the "watched only" view is active for a collection
    pub fn view_enabled(&self, kind: WatchlistKind) -> bool {
        self.state.read().view(kind)
    }

    /// Snapshot of one membership set, for the pipeline's view filter
    pub fn members(&self, kind: WatchlistKind) -> HashSet<String> {
        self.state.read().set(kind).clone()
    }

    /// Number of watched items in one collection
    pub fn len(&self, kind: WatchlistKind) -> usize {
        self.state.read().set(kind).len()
    }

    /// True when a collection has no watched items
    pub fn is_empty(&self, kind: WatchlistKind) -> bool {
        self.len(kind) == 0
    }

    /// Last mutation/load failure, if any; cleared by the next success
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn principal(&self) -> Option<String> {
        self.principal.read().clone()
    }

    /// Acquire the serialization lock for one (kind, key)
    async fn key_lock(&self, kind: WatchlistKind, key: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = self
            .in_flight
            .entry((kind, key.to_string()))
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Add with the per-key lock already held
    async fn add_locked(&self, kind: WatchlistKind, key: &str) -> bool {
        let Some(principal) = self.principal() else {
            self.state.write().error = Some("Not signed in".to_string());
            return false;
        };

        match self.gateway.add_watchlist(&principal, kind, key).await {
            Ok(()) => {
                let mut state = self.state.write();
                state.set_mut(kind).insert(key.to_string());
                state.error = None;
                debug!(kind = %kind, key = %key, "Watchlist entry added");
                true
            }
            Err(err) => {
                warn!(kind = %kind, key = %key, error = %err, "Watchlist add failed");
                self.state.write().error = Some(err.to_string());
                false
            }
        }
    }

    /// Remove with the per-key lock already held
    async fn remove_locked(&self, kind: WatchlistKind, key: &str) -> bool {
        let Some(principal) = self.principal() else {
            self.state.write().error = Some("Not signed in".to_string());
            return false;
        };

        match self.gateway.remove_watchlist(&principal, kind, key).await {
            Ok(()) => {
                let mut state = self.state.write();
                state.set_mut(kind).remove(key);
                state.error = None;
                state.enforce_view_invariant(kind);
                debug!(kind = %kind, key = %key, "Watchlist entry removed");
                true
            }
            Err(err) => {
                warn!(kind = %kind, key = %key, error = %err, "Watchlist remove failed");
                self.state.write().error = Some(err.to_string());
                false
            }
        }
    }
}

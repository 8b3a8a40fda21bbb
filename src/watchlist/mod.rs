//! Watchlist synchronization store
//!
//! Keeps the two watchlist membership sets (crypto symbols, user handles)
//! consistent with the remote store under concurrent mutation. The local sets
//! only ever lag the server's acknowledged state; they never run ahead of it.

mod store;

pub use store::WatchlistStore;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::{PersistedState, StateStore};
use crate::error::AppResult;
use crate::models::Movie;

/// Maximum number of entries kept in the recently-viewed history
pub const HISTORY_CAP: usize = 5;

/// Tracks the user's recently-viewed history and curated watchlist.
///
/// History is most-recent-first, deduplicated by movie id, and capped at
/// [`HISTORY_CAP`] entries. The watchlist preserves insertion order and
/// never holds two entries with the same id. Only this type's methods
/// mutate the state; everything else reads snapshots.
///
/// Every mutation writes the full state back to the store. A failed write
/// is retried once; a second failure is logged and returned to the caller,
/// while the in-memory mutation stands (the next successful write will
/// catch the store up).
pub struct PreferenceTracker {
    state: RwLock<PersistedState>,
    store: Arc<dyn StateStore>,
}

impl PreferenceTracker {
    /// Restores the tracker from the store, starting empty when nothing
    /// has been persisted yet.
    pub async fn restore(store: Arc<dyn StateStore>) -> AppResult<Self> {
        let state = store.load().await?.unwrap_or_default();

        tracing::info!(
            history_len = state.history.len(),
            watchlist_len = state.watchlist.len(),
            "Restored tracker state"
        );

        Ok(Self {
            state: RwLock::new(state),
            store,
        })
    }

    /// Records a view: any prior entry with the same id is removed, the
    /// movie is pushed to the front, and the history is truncated to the
    /// cap. Re-viewing the front entry leaves the history content-equal.
    pub async fn record_view(&self, movie: Movie) -> AppResult<()> {
        let snapshot = {
            let mut state = self.state.write().await;
            state.history.retain(|m| m.id != movie.id);
            state.history.insert(0, movie);
            state.history.truncate(HISTORY_CAP);
            state.clone()
        };
        self.persist(&snapshot).await
    }

    /// Adds a movie to the watchlist. Adding an id that is already present
    /// is a no-op. The authenticated-user precondition is the caller's to
    /// enforce; the tracker does not check identity.
    pub async fn add_to_watchlist(&self, movie: Movie) -> AppResult<()> {
        let snapshot = {
            let mut state = self.state.write().await;
            if state.watchlist.iter().any(|m| m.id == movie.id) {
                return Ok(());
            }
            state.watchlist.push(movie);
            state.clone()
        };
        self.persist(&snapshot).await
    }

    /// Removes a movie from the watchlist by id; absent ids are a no-op.
    pub async fn remove_from_watchlist(&self, id: u64) -> AppResult<()> {
        let snapshot = {
            let mut state = self.state.write().await;
            let before = state.watchlist.len();
            state.watchlist.retain(|m| m.id != id);
            if state.watchlist.len() == before {
                return Ok(());
            }
            state.clone()
        };
        self.persist(&snapshot).await
    }

    /// Watchlist membership query
    pub async fn is_in_watchlist(&self, id: u64) -> bool {
        let state = self.state.read().await;
        state.watchlist.iter().any(|m| m.id == id)
    }

    /// Snapshot of the history, most recent first
    pub async fn history(&self) -> Vec<Movie> {
        self.state.read().await.history.clone()
    }

    /// Snapshot of the watchlist in insertion order
    pub async fn watchlist(&self) -> Vec<Movie> {
        self.state.read().await.watchlist.clone()
    }

    /// Writes the snapshot to the store, retrying once before giving up.
    async fn persist(&self, snapshot: &PersistedState) -> AppResult<()> {
        if let Err(first) = self.store.save(snapshot).await {
            tracing::debug!(error = %first, "State write failed, retrying");
            if let Err(second) = self.store.save(snapshot).await {
                tracing::warn!(error = %second, "State write failed after retry");
                return Err(second);
            }
        }
        Ok(())
    }
}

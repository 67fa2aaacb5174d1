use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::Movie;

/// Single namespaced key holding the serialized {history, watchlist} pair
const STATE_KEY: &str = "cinescout:watchlist";

/// Creates a Redis client for the durability layer
///
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// The persisted form of the preference tracker's state.
///
/// Written back in full on every mutation; there is no incremental update
/// path, the pair is small enough to serialize wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersistedState {
    pub history: Vec<Movie>,
    pub watchlist: Vec<Movie>,
}

/// Key-value durability layer for the preference tracker.
///
/// Loaded once at startup and written on every mutation. Implementations
/// must return write failures to the caller; the tracker owns the retry
/// policy.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the persisted state, `None` when nothing has been saved yet
    async fn load(&self) -> AppResult<Option<PersistedState>>;

    /// Writes the full state under the namespaced key
    async fn save(&self, state: &PersistedState) -> AppResult<()>;
}

/// Redis-backed state store
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StateStore for RedisStore {
    async fn load(&self) -> AppResult<Option<PersistedState>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(STATE_KEY).await?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(state) => Ok(Some(state)),
                Err(e) => {
                    // A corrupt snapshot is not worth failing startup over;
                    // start empty and let the next mutation overwrite it.
                    tracing::warn!(error = %e, "Discarding unreadable persisted state");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, state: &PersistedState) -> AppResult<()> {
        let json = serde_json::to_string(state)
            .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(STATE_KEY, json).await?;

        tracing::debug!(
            history_len = state.history.len(),
            watchlist_len = state.watchlist.len(),
            "Persisted tracker state"
        );

        Ok(())
    }
}

pub mod store;

pub use store::{create_redis_client, PersistedState, RedisStore, StateStore};

//! Process-local cache of status snapshots served over the local web server.
//!
//! Entries are keyed by a closed set of [`CacheKey`]s. Readers never wait on
//! population: a key that has not been stored yet is reported as
//! [`CacheError::Miss`].

mod key;
mod refresher;
mod store;

pub use key::{CacheKey, UnknownCacheKey};
pub use refresher::CacheRefresher;
pub use store::{CacheError, CacheStore, CachedValue, InMemoryCache};

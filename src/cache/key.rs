use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Well-known cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Latest snapshot of the instance's cluster, including replication status.
    Cluster,
    /// Environment handed to the WAL restore command.
    WalRestore,
    /// Environment handed to the WAL archive command.
    WalArchive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache key '{0}'")]
pub struct UnknownCacheKey(pub String);

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Cluster, CacheKey::WalRestore, CacheKey::WalArchive];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::Cluster => "cluster",
            CacheKey::WalRestore => "wal-restore",
            CacheKey::WalArchive => "wal-archive",
        }
    }

    /// Whether the entry holds an environment rather than a cluster snapshot.
    pub fn is_env(self) -> bool {
        match self {
            CacheKey::Cluster => false,
            CacheKey::WalRestore | CacheKey::WalArchive => true,
        }
    }
}

impl FromStr for CacheKey {
    type Err = UnknownCacheKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownCacheKey(s.to_string()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Configuration for the instance web server.
//!
//! Loaded from TOML, with every section optional and defaulted so that an
//! absent file still yields a usable (if unvalidated) configuration.

mod credentials;
mod loader;
mod types;

pub use credentials::{read_token, SecureString};
pub use loader::ConfigError;
pub use types::{ApiConfig, BackupConfig, CacheConfig, Config, InstanceConfig, ServerConfig};

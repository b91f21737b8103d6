//! Loopback web server embedded in a PostgreSQL instance manager.
//!
//! Co-located processes use it to read cached cluster state and to trigger
//! physical backups of the instance's cluster.

pub mod api;
pub mod backup;
pub mod cache;
pub mod client;
pub mod config;
pub mod events;
pub mod instance;
pub mod logging;
pub mod server;

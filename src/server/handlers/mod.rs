mod backup;
mod cache;

pub use backup::request_backup;
pub use cache::serve_cache;

pub mod connection;
pub mod entities;
pub mod repositories;

pub use connection::*;
pub use repositories::content_repository::{CachedContent, ContentRepository};
pub use repositories::snapshot_repository::SnapshotRepository;

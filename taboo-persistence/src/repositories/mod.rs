pub mod content_repository;
pub mod snapshot_repository;

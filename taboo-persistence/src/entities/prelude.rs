pub use super::content_cache::Entity as ContentCache;
pub use super::game_snapshots::Entity as GameSnapshots;

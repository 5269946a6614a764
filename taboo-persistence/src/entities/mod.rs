pub mod content_cache;
pub mod game_snapshots;
pub mod prelude;

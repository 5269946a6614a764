pub mod content;
pub mod deck;
pub mod game_events;
pub mod game_mode;
pub mod game_state;
pub mod machine;
pub mod random;
pub mod scoring;
pub mod snapshot;

// Re-export main components
pub use content::*;
pub use deck::*;
pub use game_events::*;
pub use game_mode::*;
pub use game_state::*;
pub use machine::*;
pub use random::*;
pub use scoring::*;
pub use snapshot::{
    SnapshotError, deserialize as deserialize_snapshot, serialize as serialize_snapshot,
};

pub mod actions;
pub mod content;
pub mod errors;
pub mod game;

// Re-export all types
pub use actions::*;
pub use content::*;
pub use errors::*;
pub use game::*;

pub type TeamId = uuid::Uuid;
pub type PlayerId = uuid::Uuid;
/// Id of a scoring entity: a team or a player.
pub type EntityId = uuid::Uuid;
pub type CardId = String;
pub type PrendaId = String;

//! Byte codec for persisted game state.

use taboo_types::GameState;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode game snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode game snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn serialize(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    serde_json::to_vec(state).map_err(SnapshotError::Encode)
}

/// Missing fields take their initial values; unknown fields are ignored.
pub fn deserialize(bytes: &[u8]) -> Result<GameState, SnapshotError> {
    serde_json::from_slice(bytes).map_err(SnapshotError::Decode)
}

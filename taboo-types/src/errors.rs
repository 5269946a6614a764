use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameMode, GameStatus, PlayerId, TeamId};

/// Why an action was refused. The refused action never changes the game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    // Precondition violations
    #[error("need at least 2 teams, found {found}")]
    NotEnoughTeams { found: usize },
    #[error("need at least 2 players, found {found}")]
    NotEnoughPlayers { found: usize },
    #[error("score to win must be positive")]
    InvalidScoreToWin,
    #[error("no cards loaded")]
    EmptyCardPool,
    #[error("content is still loading")]
    ContentLoading,
    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
    #[error("game mode can only change during setup")]
    ModeLocked,
    #[error("rosters can only change during setup")]
    RosterLocked,
    #[error("duplicate id {id}")]
    DuplicateId { id: String },
    #[error("unknown team {team_id}")]
    UnknownTeam { team_id: TeamId },
    #[error("unknown player {player_id}")]
    UnknownPlayer { player_id: PlayerId },
    #[error("the reader cannot be declared the winner")]
    InvalidWinner,

    // Invalid-state operations
    #[error("{action} is not allowed while {status:?}")]
    InvalidState { status: GameStatus, action: String },
    #[error("{action} is not available in {mode:?} mode")]
    WrongMode { mode: GameMode, action: String },
    #[error("no card in play")]
    NoCurrentCard,
    #[error("skips are disabled")]
    SkipsDisabled,
}

impl GameError {
    /// Precondition violations are worth a diagnostic; the rest are routine guard hits.
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            GameError::InvalidState { .. }
                | GameError::WrongMode { .. }
                | GameError::NoCurrentCard
                | GameError::SkipsDisabled
        )
    }
}

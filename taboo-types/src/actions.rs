use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ContentSet, GameSettings, Player, PlayerId, Team, TeamId};

/// Every operation the presentation layer may dispatch against the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameAction {
    // Content
    BeginContentLoad,
    ContentLoaded(ContentSet),

    // Setup
    UpdateSettings(GameSettings),
    AddTeam(Team),
    RemoveTeam(TeamId),
    AddPlayer(Player),
    RemovePlayer(PlayerId),
    StartGame,

    // Turn flow
    StartRound,
    EndRound,
    Tick,
    NextTurn,
    RestartGame { reset_teams: bool },

    // Team-mode card resolution
    ScoreCard,
    SkipCard,
    RecordRefusal,

    // Prenda checkpoint
    PrendaDone,
    FailPrenda,

    // Individual mode
    DeclareWinner(PlayerId),
    DeclareTaboo,
    SkipRound,
}

impl GameAction {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::BeginContentLoad => "begin_content_load",
            GameAction::ContentLoaded(_) => "content_loaded",
            GameAction::UpdateSettings(_) => "update_settings",
            GameAction::AddTeam(_) => "add_team",
            GameAction::RemoveTeam(_) => "remove_team",
            GameAction::AddPlayer(_) => "add_player",
            GameAction::RemovePlayer(_) => "remove_player",
            GameAction::StartGame => "start_game",
            GameAction::StartRound => "start_round",
            GameAction::EndRound => "end_round",
            GameAction::Tick => "tick",
            GameAction::NextTurn => "next_turn",
            GameAction::RestartGame { .. } => "restart_game",
            GameAction::ScoreCard => "score_card",
            GameAction::SkipCard => "skip_card",
            GameAction::RecordRefusal => "record_refusal",
            GameAction::PrendaDone => "prenda_done",
            GameAction::FailPrenda => "fail_prenda",
            GameAction::DeclareWinner(_) => "declare_winner",
            GameAction::DeclareTaboo => "declare_taboo",
            GameAction::SkipRound => "skip_round",
        }
    }
}

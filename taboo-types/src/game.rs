use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{Card, CardId, PlayerId, Prenda, TeamId};
use std::collections::BTreeSet;

const TEAM_PALETTE: [&str; 6] = [
    "bg-blue-500",
    "bg-red-500",
    "bg-green-500",
    "bg-yellow-500",
    "bg-purple-500",
    "bg-pink-500",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GameMode {
    Teams,
    Individual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub mode: GameMode,
    /// Full rotations before a team game ends; 0 disables the limit.
    pub rounds: u32,
    /// Points needed to win an individual game.
    pub score_to_win: u32,
    /// Seconds per round, always positive.
    pub time_per_round: u32,
    /// `None` means the round is bounded by time only.
    pub cards_per_round: Option<u32>,
    pub prendas_enabled: bool,
    pub allow_skips: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Teams,
            rounds: 999,
            score_to_win: 0,
            time_per_round: 60,
            cards_per_round: None,
            prendas_enabled: true,
            allow_skips: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GameStatus {
    Setup,
    TurnReady,
    Playing,
    PrendaAlert,
    RoundSummary,
    GameOver,
}

/// Cumulative per-entity tallies. `total_cards == correct + taboos + skipped`
/// holds after every resolved card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Statistics {
    pub total_cards: u32,
    pub correct: u32,
    pub taboos: u32,
    pub skipped: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: u32,
    pub color: String,
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub statistics: Statistics,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
            color: color.into(),
            players: Vec::new(),
            statistics: Statistics::default(),
        }
    }

    /// Default color for the n-th team, cycling through the palette.
    pub fn palette_color(index: usize) -> &'static str {
        TEAM_PALETTE[index % TEAM_PALETTE.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

impl Player {
    pub fn new(name: impl Into<String>, team_id: Option<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_id,
        }
    }
}

/// Individual-mode scoreboard entry, one per player, created when the game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub player_name: String,
    pub score: u32,
    #[serde(default)]
    pub statistics: Statistics,
}

impl From<&Player> for PlayerScore {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id,
            player_name: player.name.clone(),
            score: 0,
            statistics: Statistics::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResultStatus {
    Correct,
    /// A forbidden word was spoken.
    Smashed,
    Skipped,
    /// A forbidden word was spoken and a prenda was drawn.
    Prenda,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundResult {
    pub card_id: CardId,
    pub status: ResultStatus,
    #[ts(type = "number")]
    pub timestamp: i64, // milliseconds since the Unix epoch
}

/// The full game snapshot. Presentation re-renders from it and persistence
/// stores it verbatim; `is_loading` is the only field left out of snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct GameState {
    pub settings: GameSettings,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub player_scores: Vec<PlayerScore>,
    pub status: GameStatus,

    #[serde(skip, default = "loading_by_default")]
    pub is_loading: bool,
    pub all_cards: Vec<Card>,
    pub all_prendas: Vec<Prenda>,

    pub current_team_index: usize,
    pub current_reader_index: usize,
    pub selected_winner_id: Option<PlayerId>,
    pub current_card: Option<Card>,
    pub current_prenda: Option<Prenda>,
    pub round_time_remaining: u32,
    pub current_round_score: u32,
    pub round_results: Vec<RoundResult>,

    pub deck: Vec<Card>,
    pub used_card_ids: BTreeSet<CardId>,
    pub current_round_number: u32,
}

fn loading_by_default() -> bool {
    true
}

impl Default for GameState {
    fn default() -> Self {
        let settings = GameSettings::default();
        let round_time_remaining = settings.time_per_round;
        Self {
            settings,
            teams: Vec::new(),
            players: Vec::new(),
            player_scores: Vec::new(),
            status: GameStatus::Setup,
            is_loading: true,
            all_cards: Vec::new(),
            all_prendas: Vec::new(),
            current_team_index: 0,
            current_reader_index: 0,
            selected_winner_id: None,
            current_card: None,
            current_prenda: None,
            round_time_remaining,
            current_round_score: 0,
            round_results: Vec::new(),
            deck: Vec::new(),
            used_card_ids: BTreeSet::new(),
            current_round_number: 0,
        }
    }
}

impl GameState {
    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.current_team_index)
    }

    pub fn current_reader(&self) -> Option<&PlayerScore> {
        self.player_scores.get(self.current_reader_index)
    }

    /// Cards in the deck that have not been used yet this game, in deck order.
    pub fn available_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .iter()
            .filter(|card| !self.used_card_ids.contains(&card.id))
    }
}

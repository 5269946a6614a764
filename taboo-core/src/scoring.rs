use serde::{Deserialize, Serialize};
use taboo_types::{
    EntityId, GameMode, GameState, PlayerScore, ResultStatus, RoundResult, Statistics, Team,
};

/// Anything that carries a score and statistics: a team in team mode, a
/// player in individual mode.
pub trait Scorable {
    fn entity_id(&self) -> EntityId;
    fn display_name(&self) -> &str;
    fn score(&self) -> u32;
    fn score_mut(&mut self) -> &mut u32;
    fn statistics(&self) -> &Statistics;
    fn statistics_mut(&mut self) -> &mut Statistics;
}

impl Scorable for Team {
    fn entity_id(&self) -> EntityId {
        self.id
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn score(&self) -> u32 {
        self.score
    }
    fn score_mut(&mut self) -> &mut u32 {
        &mut self.score
    }
    fn statistics(&self) -> &Statistics {
        &self.statistics
    }
    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}

impl Scorable for PlayerScore {
    fn entity_id(&self) -> EntityId {
        self.player_id
    }
    fn display_name(&self) -> &str {
        &self.player_name
    }
    fn score(&self) -> u32 {
        self.score
    }
    fn score_mut(&mut self) -> &mut u32 {
        &mut self.score
    }
    fn statistics(&self) -> &Statistics {
        &self.statistics
    }
    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOp {
    Correct { streak_so_far: u32 },
    Taboo,
    Skip,
    PenaltyFailure,
    /// Individual mode: the player who guessed the word.
    GuessCredit,
}

pub struct ScoringEngine;

impl ScoringEngine {
    pub fn apply<E: Scorable>(entity: E, op: ScoreOp) -> E {
        match op {
            ScoreOp::Correct { streak_so_far } => Self::apply_correct(entity, streak_so_far),
            ScoreOp::Taboo => Self::apply_taboo(entity),
            ScoreOp::Skip => Self::apply_skip(entity),
            ScoreOp::PenaltyFailure => Self::apply_penalty_failure(entity),
            ScoreOp::GuessCredit => Self::apply_guess_credit(entity),
        }
    }

    pub fn apply_correct<E: Scorable>(mut entity: E, streak_so_far: u32) -> E {
        *entity.score_mut() += 1;
        let stats = entity.statistics_mut();
        stats.total_cards += 1;
        stats.correct += 1;
        stats.current_streak = streak_so_far + 1;
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        entity
    }

    /// Score is untouched; the prenda carries the penalty.
    pub fn apply_taboo<E: Scorable>(mut entity: E) -> E {
        let stats = entity.statistics_mut();
        stats.total_cards += 1;
        stats.taboos += 1;
        stats.current_streak = 0;
        entity
    }

    pub fn apply_skip<E: Scorable>(mut entity: E) -> E {
        let stats = entity.statistics_mut();
        stats.total_cards += 1;
        stats.skipped += 1;
        stats.current_streak = 0;
        entity
    }

    /// Floored at zero in every mode.
    pub fn apply_penalty_failure<E: Scorable>(mut entity: E) -> E {
        let score = entity.score_mut();
        *score = score.saturating_sub(1);
        entity
    }

    pub fn apply_guess_credit<E: Scorable>(mut entity: E) -> E {
        *entity.score_mut() += 1;
        entity
    }
}

pub fn is_consistent(stats: &Statistics) -> bool {
    stats.total_cards == stats.correct + stats.taboos + stats.skipped
        && stats.current_streak <= stats.longest_streak
}

/// Consecutive correct results at the end of the round log.
pub fn round_streak(results: &[RoundResult]) -> u32 {
    results
        .iter()
        .rev()
        .take_while(|r| r.status == ResultStatus::Correct)
        .count() as u32
}

/// Rounded percentage of resolved cards that were guessed.
pub fn accuracy(stats: &Statistics) -> u32 {
    if stats.total_cards == 0 {
        return 0;
    }
    (stats.correct * 100 + stats.total_cards / 2) / stats.total_cards
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    pub corrects: u32,
    pub skips: u32,
    /// Smashed and prenda results together.
    pub errors: u32,
    pub streak: u32,
}

impl RoundTally {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let mut tally = RoundTally {
            streak: round_streak(results),
            ..Default::default()
        };
        for result in results {
            match result.status {
                ResultStatus::Correct => tally.corrects += 1,
                ResultStatus::Skipped => tally.skips += 1,
                ResultStatus::Smashed | ResultStatus::Prenda => tally.errors += 1,
            }
        }
        tally
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: EntityId,
    pub name: String,
    pub score: u32,
    pub accuracy: u32,
    pub statistics: Statistics,
}

impl Standing {
    fn of<E: Scorable>(entity: &E) -> Self {
        Standing {
            id: entity.entity_id(),
            name: entity.display_name().to_string(),
            score: entity.score(),
            accuracy: accuracy(entity.statistics()),
            statistics: entity.statistics().clone(),
        }
    }
}

/// All scoring entities of the current mode, highest score first. Ties keep
/// roster order.
pub fn standings(state: &GameState) -> Vec<Standing> {
    let mut table: Vec<Standing> = match state.settings.mode {
        GameMode::Teams => state.teams.iter().map(Standing::of).collect(),
        GameMode::Individual => state.player_scores.iter().map(Standing::of).collect(),
    };
    table.sort_by(|a, b| b.score.cmp(&a.score));
    table
}

/// Every entity sharing the top score; more than one entry means a tie.
pub fn winners(state: &GameState) -> Vec<Standing> {
    let table = standings(state);
    let Some(top) = table.first().map(|s| s.score) else {
        return Vec::new();
    };
    table.into_iter().take_while(|s| s.score == top).collect()
}

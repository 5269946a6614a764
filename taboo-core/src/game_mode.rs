//! The two rule sets the state machine dispatches between.

use taboo_types::{GameAction, GameError, GameMode, GameState, PlayerScore, Statistics};

/// Which scoreboard entry an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySlot {
    Team(usize),
    Player(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    Next,
    GameOver,
}

/// What happens once a prenda has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrendaFollowUp {
    DrawNext,
    EndRound,
}

pub trait ModeRules: Send + Sync {
    fn mode(&self) -> GameMode;

    /// Minimum entity counts and mode-specific settings needed to start.
    fn validate_start(&self, state: &GameState) -> Result<(), GameError>;

    /// Fresh scores and statistics, turn pointer on the first entity.
    fn prepare_scoreboard(&self, state: &mut GameState);

    /// The entity credited or charged for the card in play.
    fn active_slot(&self, state: &GameState) -> Option<EntitySlot>;

    /// Moves the turn pointer on, or reports that the game is over.
    fn advance_turn(&self, state: &mut GameState) -> TurnAdvance;

    fn prenda_follow_up(&self) -> PrendaFollowUp;

    /// Mode-specific actions; everything else is shared.
    fn permits(&self, action: &GameAction) -> bool;
}

pub struct TeamRules;
pub struct IndividualRules;

pub fn rules_for(mode: GameMode) -> &'static dyn ModeRules {
    match mode {
        GameMode::Teams => &TeamRules,
        GameMode::Individual => &IndividualRules,
    }
}

impl ModeRules for TeamRules {
    fn mode(&self) -> GameMode {
        GameMode::Teams
    }

    fn validate_start(&self, state: &GameState) -> Result<(), GameError> {
        if state.teams.len() < 2 {
            return Err(GameError::NotEnoughTeams {
                found: state.teams.len(),
            });
        }
        Ok(())
    }

    fn prepare_scoreboard(&self, state: &mut GameState) {
        for team in &mut state.teams {
            team.score = 0;
            team.statistics = Statistics::default();
        }
        state.current_team_index = 0;
    }

    fn active_slot(&self, state: &GameState) -> Option<EntitySlot> {
        (state.current_team_index < state.teams.len())
            .then_some(EntitySlot::Team(state.current_team_index))
    }

    /// Round-robin over teams; the game ends after `rounds` full rotations.
    fn advance_turn(&self, state: &mut GameState) -> TurnAdvance {
        let team_count = state.teams.len().max(1);
        let next_index = (state.current_team_index + 1) % team_count;
        let mut next_round = state.current_round_number;
        if next_index == 0 {
            next_round += 1;
        }

        if state.settings.rounds > 0 && next_round > state.settings.rounds {
            return TurnAdvance::GameOver;
        }

        state.current_team_index = next_index;
        state.current_round_number = next_round;
        TurnAdvance::Next
    }

    fn prenda_follow_up(&self) -> PrendaFollowUp {
        PrendaFollowUp::DrawNext
    }

    fn permits(&self, action: &GameAction) -> bool {
        !matches!(
            action,
            GameAction::DeclareWinner(_) | GameAction::DeclareTaboo | GameAction::SkipRound
        )
    }
}

impl ModeRules for IndividualRules {
    fn mode(&self) -> GameMode {
        GameMode::Individual
    }

    fn validate_start(&self, state: &GameState) -> Result<(), GameError> {
        if state.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                found: state.players.len(),
            });
        }
        if state.settings.score_to_win == 0 {
            return Err(GameError::InvalidScoreToWin);
        }
        Ok(())
    }

    fn prepare_scoreboard(&self, state: &mut GameState) {
        state.player_scores = state.players.iter().map(PlayerScore::from).collect();
        state.current_reader_index = 0;
        state.selected_winner_id = None;
    }

    fn active_slot(&self, state: &GameState) -> Option<EntitySlot> {
        (state.current_reader_index < state.player_scores.len())
            .then_some(EntitySlot::Player(state.current_reader_index))
    }

    /// First to `score_to_win` ends the game; otherwise the next player reads.
    fn advance_turn(&self, state: &mut GameState) -> TurnAdvance {
        let target = state.settings.score_to_win;
        if state.player_scores.iter().any(|p| p.score >= target) {
            return TurnAdvance::GameOver;
        }

        let reader_count = state.player_scores.len().max(1);
        let next_index = (state.current_reader_index + 1) % reader_count;
        if next_index == 0 {
            state.current_round_number += 1;
        }
        state.current_reader_index = next_index;
        TurnAdvance::Next
    }

    /// Individual rounds are a single card.
    fn prenda_follow_up(&self) -> PrendaFollowUp {
        PrendaFollowUp::EndRound
    }

    fn permits(&self, action: &GameAction) -> bool {
        !matches!(
            action,
            GameAction::ScoreCard | GameAction::SkipCard | GameAction::RecordRefusal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taboo_types::{GameSettings, Player, Team};

    fn team_state(teams: usize, rounds: u32) -> GameState {
        let mut state = GameState::default();
        state.settings.rounds = rounds;
        state.teams = (0..teams)
            .map(|i| Team::new(format!("Team {i}"), Team::palette_color(i)))
            .collect();
        state.current_round_number = 1;
        state
    }

    #[test]
    fn test_rules_match_requested_mode() {
        assert_eq!(rules_for(GameMode::Teams).mode(), GameMode::Teams);
        assert_eq!(rules_for(GameMode::Individual).mode(), GameMode::Individual);
    }

    #[test]
    fn test_team_rotation_and_round_count() {
        let mut state = team_state(3, 2);
        let rules = rules_for(GameMode::Teams);

        let mut seen = vec![state.current_team_index];
        while rules.advance_turn(&mut state) == TurnAdvance::Next {
            seen.push(state.current_team_index);
        }

        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(state.current_round_number, 2);
    }

    #[test]
    fn test_zero_rounds_never_ends() {
        let mut state = team_state(2, 0);
        let rules = rules_for(GameMode::Teams);
        for _ in 0..50 {
            assert_eq!(rules.advance_turn(&mut state), TurnAdvance::Next);
        }
        assert_eq!(state.current_round_number, 26);
    }

    #[test]
    fn test_team_start_needs_two_teams() {
        let state = team_state(1, 1);
        assert_eq!(
            TeamRules.validate_start(&state),
            Err(GameError::NotEnoughTeams { found: 1 })
        );
    }

    #[test]
    fn test_individual_start_preconditions() {
        let mut state = GameState::default();
        state.settings = GameSettings {
            mode: GameMode::Individual,
            score_to_win: 0,
            ..Default::default()
        };
        state.players = vec![Player::new("Ana", None)];
        assert_eq!(
            IndividualRules.validate_start(&state),
            Err(GameError::NotEnoughPlayers { found: 1 })
        );

        state.players.push(Player::new("Bia", None));
        assert_eq!(
            IndividualRules.validate_start(&state),
            Err(GameError::InvalidScoreToWin)
        );

        state.settings.score_to_win = 3;
        assert_eq!(IndividualRules.validate_start(&state), Ok(()));
    }

    #[test]
    fn test_individual_game_over_by_score() {
        let mut state = GameState::default();
        state.settings.mode = GameMode::Individual;
        state.settings.score_to_win = 2;
        state.players = vec![Player::new("Ana", None), Player::new("Bia", None)];
        IndividualRules.prepare_scoreboard(&mut state);
        state.current_round_number = 1;

        assert_eq!(IndividualRules.advance_turn(&mut state), TurnAdvance::Next);
        assert_eq!(state.current_reader_index, 1);
        assert_eq!(IndividualRules.advance_turn(&mut state), TurnAdvance::Next);
        assert_eq!(state.current_reader_index, 0);
        assert_eq!(state.current_round_number, 2);

        state.player_scores[1].score = 2;
        assert_eq!(IndividualRules.advance_turn(&mut state), TurnAdvance::GameOver);
        assert_eq!(state.current_reader_index, 0);
    }

    #[test]
    fn test_mode_specific_actions() {
        assert!(!TeamRules.permits(&GameAction::DeclareTaboo));
        assert!(TeamRules.permits(&GameAction::ScoreCard));
        assert!(!IndividualRules.permits(&GameAction::ScoreCard));
        assert!(IndividualRules.permits(&GameAction::SkipRound));
        assert!(IndividualRules.permits(&GameAction::StartRound));
    }
}

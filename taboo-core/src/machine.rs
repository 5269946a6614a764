//! Turn/round state machine as a pure transition function.
//!
//! `transition` never touches its input: it works on a clone and either
//! returns the next state or the reason the action was refused.

use taboo_types::{
    Card, GameAction, GameError, GameSettings, GameState, GameStatus, Player, PlayerId, Prenda,
    ResultStatus, RoundResult, Team, TeamId,
};
use tracing::info;

use crate::deck;
use crate::game_mode::{EntitySlot, ModeRules, PrendaFollowUp, TurnAdvance, rules_for};
use crate::random::RandomSource;
use crate::scoring::{ScoreOp, ScoringEngine};

/// Side inputs a transition may consume.
pub struct TransitionContext<'a> {
    pub rng: &'a mut dyn RandomSource,
    pub now_millis: i64,
}

impl<'a> TransitionContext<'a> {
    pub fn new(rng: &'a mut dyn RandomSource, now_millis: i64) -> Self {
        Self { rng, now_millis }
    }
}

pub fn transition(
    state: &GameState,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<GameState, GameError> {
    let rules = rules_for(state.settings.mode);
    if !rules.permits(action) {
        return Err(GameError::WrongMode {
            mode: rules.mode(),
            action: action.name().to_string(),
        });
    }

    let mut next = state.clone();
    match action {
        GameAction::BeginContentLoad => next.is_loading = true,
        GameAction::ContentLoaded(content) => {
            next.all_cards = content.cards.clone();
            next.all_prendas = content.prendas.clone();
            next.is_loading = false;
        }
        GameAction::UpdateSettings(settings) => update_settings(&mut next, settings)?,
        GameAction::AddTeam(team) => add_team(&mut next, team)?,
        GameAction::RemoveTeam(team_id) => remove_team(&mut next, *team_id)?,
        GameAction::AddPlayer(player) => add_player(&mut next, player)?,
        GameAction::RemovePlayer(player_id) => remove_player(&mut next, *player_id)?,
        GameAction::StartGame => start_game(&mut next, rules, ctx)?,
        GameAction::StartRound => start_round(&mut next, action, ctx)?,
        GameAction::EndRound => {
            require_status(&next, GameStatus::Playing, action)?;
            end_round(&mut next);
        }
        GameAction::Tick => tick(&mut next, action)?,
        GameAction::NextTurn => next_turn(&mut next, rules, action)?,
        GameAction::RestartGame { reset_teams } => restart_game(&mut next, *reset_teams),
        GameAction::ScoreCard => score_card(&mut next, rules, action, ctx)?,
        GameAction::SkipCard => skip_card(&mut next, rules, action, ctx)?,
        GameAction::RecordRefusal => record_refusal(&mut next, rules, action, ctx)?,
        GameAction::PrendaDone => resolve_prenda(&mut next, rules, action, false)?,
        GameAction::FailPrenda => resolve_prenda(&mut next, rules, action, true)?,
        GameAction::DeclareWinner(player_id) => {
            declare_winner(&mut next, rules, action, *player_id, ctx)?
        }
        GameAction::DeclareTaboo => declare_taboo(&mut next, rules, action, ctx)?,
        GameAction::SkipRound => skip_round(&mut next, rules, action, ctx)?,
    }
    Ok(next)
}

/// Puts the next unused card in play, or ends the round when the per-round
/// card limit is reached or the deck is exhausted.
pub fn draw_card(state: &mut GameState) {
    if let Some(limit) = state.settings.cards_per_round {
        if state.round_results.len() >= limit as usize {
            end_round(state);
            return;
        }
    }

    match deck::draw_next(&state.deck, &state.used_card_ids) {
        Some(card) => state.current_card = Some(card.clone()),
        None => {
            info!("Deck exhausted mid-round, ending round");
            end_round(state);
        }
    }
}

fn end_round(state: &mut GameState) {
    state.status = GameStatus::RoundSummary;
    state.current_card = None;
    state.current_prenda = None;
}

fn require_status(
    state: &GameState,
    expected: GameStatus,
    action: &GameAction,
) -> Result<(), GameError> {
    if state.status == expected {
        Ok(())
    } else {
        Err(GameError::InvalidState {
            status: state.status,
            action: action.name().to_string(),
        })
    }
}

fn require_setup(state: &GameState) -> Result<(), GameError> {
    if state.status == GameStatus::Setup {
        Ok(())
    } else {
        Err(GameError::RosterLocked)
    }
}

fn card_in_play(state: &GameState) -> Result<Card, GameError> {
    state.current_card.clone().ok_or(GameError::NoCurrentCard)
}

fn normalized(settings: &GameSettings) -> GameSettings {
    let mut settings = settings.clone();
    if settings.cards_per_round == Some(0) {
        settings.cards_per_round = None;
    }
    settings
}

fn update_slot(state: &mut GameState, slot: EntitySlot, op: ScoreOp) {
    match slot {
        EntitySlot::Team(index) => {
            if let Some(team) = state.teams.get(index).cloned() {
                state.teams[index] = ScoringEngine::apply(team, op);
            }
        }
        EntitySlot::Player(index) => {
            if let Some(player) = state.player_scores.get(index).cloned() {
                state.player_scores[index] = ScoringEngine::apply(player, op);
            }
        }
    }
}

fn streak_of(state: &GameState, slot: EntitySlot) -> u32 {
    match slot {
        EntitySlot::Team(index) => state.teams.get(index).map(|t| t.statistics.current_streak),
        EntitySlot::Player(index) => state
            .player_scores
            .get(index)
            .map(|p| p.statistics.current_streak),
    }
    .unwrap_or(0)
}

fn credit_active(state: &mut GameState, rules: &dyn ModeRules, op: ScoreOp) {
    if let Some(slot) = rules.active_slot(state) {
        let op = match op {
            ScoreOp::Correct { .. } => ScoreOp::Correct {
                streak_so_far: streak_of(state, slot),
            },
            other => other,
        };
        update_slot(state, slot, op);
    }
}

fn resolve_card(state: &mut GameState, card: &Card, status: ResultStatus, now_millis: i64) {
    state.round_results.push(RoundResult {
        card_id: card.id.clone(),
        status,
        timestamp: now_millis,
    });
    state.used_card_ids.insert(card.id.clone());
}

fn pick_prenda(state: &GameState, rng: &mut dyn RandomSource) -> Option<Prenda> {
    if !state.settings.prendas_enabled || state.all_prendas.is_empty() {
        return None;
    }
    let index = rng.next_below(state.all_prendas.len());
    state.all_prendas.get(index).cloned()
}

fn update_settings(state: &mut GameState, settings: &GameSettings) -> Result<(), GameError> {
    if settings.time_per_round == 0 {
        return Err(GameError::InvalidSettings {
            reason: "time per round must be positive".to_string(),
        });
    }
    if settings.mode != state.settings.mode && state.status != GameStatus::Setup {
        return Err(GameError::ModeLocked);
    }

    state.settings = normalized(settings);
    match state.status {
        GameStatus::Playing | GameStatus::PrendaAlert => {
            state.round_results.clear();
            state.current_card = None;
            state.current_prenda = None;
            state.current_round_score = 0;
            state.round_time_remaining = state.settings.time_per_round;
            state.status = GameStatus::TurnReady;
        }
        GameStatus::Setup | GameStatus::TurnReady => {
            state.round_time_remaining = state.settings.time_per_round;
        }
        GameStatus::RoundSummary | GameStatus::GameOver => {}
    }
    Ok(())
}

fn add_team(state: &mut GameState, team: &Team) -> Result<(), GameError> {
    require_setup(state)?;
    if state.teams.iter().any(|t| t.id == team.id) {
        return Err(GameError::DuplicateId {
            id: team.id.to_string(),
        });
    }
    state.teams.push(team.clone());
    Ok(())
}

fn remove_team(state: &mut GameState, team_id: TeamId) -> Result<(), GameError> {
    require_setup(state)?;
    if !state.teams.iter().any(|t| t.id == team_id) {
        return Err(GameError::UnknownTeam { team_id });
    }
    state.teams.retain(|t| t.id != team_id);
    for player in &mut state.players {
        if player.team_id == Some(team_id) {
            player.team_id = None;
        }
    }
    Ok(())
}

fn add_player(state: &mut GameState, player: &Player) -> Result<(), GameError> {
    require_setup(state)?;
    if state.players.iter().any(|p| p.id == player.id) {
        return Err(GameError::DuplicateId {
            id: player.id.to_string(),
        });
    }
    if let Some(team_id) = player.team_id {
        let team = state
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(GameError::UnknownTeam { team_id })?;
        team.players.push(player.id);
    }
    state.players.push(player.clone());
    Ok(())
}

fn remove_player(state: &mut GameState, player_id: PlayerId) -> Result<(), GameError> {
    require_setup(state)?;
    if !state.players.iter().any(|p| p.id == player_id) {
        return Err(GameError::UnknownPlayer { player_id });
    }
    state.players.retain(|p| p.id != player_id);
    for team in &mut state.teams {
        team.players.retain(|id| *id != player_id);
    }
    Ok(())
}

fn start_game(
    state: &mut GameState,
    rules: &dyn ModeRules,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Setup, &GameAction::StartGame)?;
    if state.is_loading {
        return Err(GameError::ContentLoading);
    }
    rules.validate_start(state)?;
    if state.all_cards.is_empty() {
        return Err(GameError::EmptyCardPool);
    }

    state.settings = normalized(&state.settings);
    rules.prepare_scoreboard(state);

    state.deck = deck::shuffle_deck(&state.all_cards, ctx.rng);
    state.used_card_ids.clear();
    state.round_results.clear();
    state.current_card = None;
    state.current_prenda = None;
    state.current_round_score = 0;
    state.round_time_remaining = state.settings.time_per_round;
    state.current_round_number = 1;
    state.status = GameStatus::TurnReady;
    Ok(())
}

fn start_round(
    state: &mut GameState,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::TurnReady, action)?;

    if deck::is_exhausted(&state.deck, &state.used_card_ids) {
        info!(cards = state.deck.len(), "Every card used, reshuffling the deck");
        deck::recycle(&mut state.deck, &mut state.used_card_ids, ctx.rng);
    }

    state.status = GameStatus::Playing;
    state.round_time_remaining = state.settings.time_per_round;
    state.current_round_score = 0;
    state.round_results.clear();
    state.selected_winner_id = None;
    state.current_prenda = None;
    draw_card(state);
    Ok(())
}

fn tick(state: &mut GameState, action: &GameAction) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    state.round_time_remaining = state.round_time_remaining.saturating_sub(1);
    if state.round_time_remaining == 0 {
        end_round(state);
    }
    Ok(())
}

fn next_turn(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
) -> Result<(), GameError> {
    require_status(state, GameStatus::RoundSummary, action)?;

    state.current_card = None;
    state.current_prenda = None;
    match rules.advance_turn(state) {
        TurnAdvance::GameOver => state.status = GameStatus::GameOver,
        TurnAdvance::Next => {
            state.status = GameStatus::TurnReady;
            state.current_round_score = 0;
            state.selected_winner_id = None;
            state.round_time_remaining = state.settings.time_per_round;
        }
    }
    Ok(())
}

fn restart_game(state: &mut GameState, reset_teams: bool) {
    state.status = GameStatus::Setup;
    state.current_round_number = 0;
    state.current_team_index = 0;
    state.current_reader_index = 0;
    state.selected_winner_id = None;
    state.current_card = None;
    state.current_prenda = None;
    state.current_round_score = 0;
    state.round_time_remaining = state.settings.time_per_round;
    state.round_results.clear();
    state.deck.clear();
    state.used_card_ids.clear();

    if reset_teams {
        state.teams.clear();
        state.players.clear();
        state.player_scores.clear();
    } else {
        for team in &mut state.teams {
            team.score = 0;
        }
        for player in &mut state.player_scores {
            player.score = 0;
        }
    }
}

fn score_card(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;

    credit_active(state, rules, ScoreOp::Correct { streak_so_far: 0 });
    state.current_round_score += 1;
    resolve_card(state, &card, ResultStatus::Correct, ctx.now_millis);
    draw_card(state);
    Ok(())
}

fn skip_card(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;
    if !state.settings.allow_skips {
        return Err(GameError::SkipsDisabled);
    }

    credit_active(state, rules, ScoreOp::Skip);
    resolve_card(state, &card, ResultStatus::Skipped, ctx.now_millis);
    draw_card(state);
    Ok(())
}

fn record_refusal(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;

    credit_active(state, rules, ScoreOp::Taboo);
    let prenda = pick_prenda(state, ctx.rng);
    let status = if prenda.is_some() {
        ResultStatus::Prenda
    } else {
        ResultStatus::Smashed
    };
    resolve_card(state, &card, status, ctx.now_millis);

    match prenda {
        Some(prenda) => {
            state.current_prenda = Some(prenda);
            state.status = GameStatus::PrendaAlert;
        }
        None => draw_card(state),
    }
    Ok(())
}

fn resolve_prenda(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    failed: bool,
) -> Result<(), GameError> {
    require_status(state, GameStatus::PrendaAlert, action)?;

    if failed {
        credit_active(state, rules, ScoreOp::PenaltyFailure);
    }
    state.current_prenda = None;

    match rules.prenda_follow_up() {
        PrendaFollowUp::DrawNext => {
            state.status = GameStatus::Playing;
            draw_card(state);
        }
        PrendaFollowUp::EndRound => end_round(state),
    }
    Ok(())
}

fn declare_winner(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    guesser_id: PlayerId,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;

    let reader_id = state
        .current_reader()
        .map(|reader| reader.player_id)
        .ok_or(GameError::NoCurrentCard)?;
    if reader_id == guesser_id {
        return Err(GameError::InvalidWinner);
    }
    let guesser_index = state
        .player_scores
        .iter()
        .position(|p| p.player_id == guesser_id)
        .ok_or(GameError::UnknownPlayer {
            player_id: guesser_id,
        })?;

    credit_active(state, rules, ScoreOp::Correct { streak_so_far: 0 });
    update_slot(state, EntitySlot::Player(guesser_index), ScoreOp::GuessCredit);
    state.current_round_score += 1;
    state.selected_winner_id = Some(guesser_id);
    resolve_card(state, &card, ResultStatus::Correct, ctx.now_millis);
    end_round(state);
    Ok(())
}

fn declare_taboo(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;

    credit_active(state, rules, ScoreOp::Taboo);
    let prenda = pick_prenda(state, ctx.rng);
    let status = if prenda.is_some() {
        ResultStatus::Prenda
    } else {
        ResultStatus::Smashed
    };
    resolve_card(state, &card, status, ctx.now_millis);

    match prenda {
        Some(prenda) => {
            state.current_prenda = Some(prenda);
            state.status = GameStatus::PrendaAlert;
        }
        None => end_round(state),
    }
    Ok(())
}

fn skip_round(
    state: &mut GameState,
    rules: &dyn ModeRules,
    action: &GameAction,
    ctx: &mut TransitionContext<'_>,
) -> Result<(), GameError> {
    require_status(state, GameStatus::Playing, action)?;
    let card = card_in_play(state)?;
    if !state.settings.allow_skips {
        return Err(GameError::SkipsDisabled);
    }

    credit_active(state, rules, ScoreOp::Skip);
    resolve_card(state, &card, ResultStatus::Skipped, ctx.now_millis);
    end_round(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn playing_state(card_ids: &[&str]) -> GameState {
        let deck: Vec<Card> = card_ids
            .iter()
            .map(|id| Card::new(*id, format!("word {id}"), &["a", "b", "c", "d", "e"]))
            .collect();
        let mut state = GameState::default();
        state.is_loading = false;
        state.all_cards = deck.clone();
        state.deck = deck;
        state.status = GameStatus::Playing;
        state
    }

    #[test]
    fn test_draw_card_respects_card_limit() {
        let mut state = playing_state(&["a", "b", "c"]);
        state.settings.cards_per_round = Some(1);
        state.round_results.push(RoundResult {
            card_id: "a".to_string(),
            status: ResultStatus::Correct,
            timestamp: 0,
        });
        state.used_card_ids.insert("a".to_string());

        draw_card(&mut state);
        assert_eq!(state.status, GameStatus::RoundSummary);
        assert!(state.current_card.is_none());
    }

    #[test]
    fn test_draw_card_takes_first_unused() {
        let mut state = playing_state(&["a", "b", "c"]);
        state.used_card_ids.insert("a".to_string());

        draw_card(&mut state);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.current_card.map(|c| c.id), Some("b".to_string()));
    }

    #[test]
    fn test_draw_card_ends_round_on_exhaustion() {
        let mut state = playing_state(&["a"]);
        state.used_card_ids.insert("a".to_string());

        draw_card(&mut state);
        assert_eq!(state.status, GameStatus::RoundSummary);
    }

    #[test]
    fn test_tick_ends_round_at_zero() {
        let mut state = playing_state(&["a"]);
        state.round_time_remaining = 2;
        let mut rng = SequenceRandom::identity();
        let mut ctx = TransitionContext::new(&mut rng, 0);

        let state = transition(&state, &GameAction::Tick, &mut ctx).unwrap();
        assert_eq!(state.round_time_remaining, 1);
        assert_eq!(state.status, GameStatus::Playing);

        let state = transition(&state, &GameAction::Tick, &mut ctx).unwrap();
        assert_eq!(state.round_time_remaining, 0);
        assert_eq!(state.status, GameStatus::RoundSummary);

        let err = transition(&state, &GameAction::Tick, &mut ctx).unwrap_err();
        assert!(matches!(err, GameError::InvalidState { .. }));
    }

    #[test]
    fn test_update_settings_rejects_zero_time() {
        let state = GameState::default();
        let mut rng = SequenceRandom::identity();
        let mut ctx = TransitionContext::new(&mut rng, 0);
        let settings = GameSettings {
            time_per_round: 0,
            ..Default::default()
        };

        let err = transition(&state, &GameAction::UpdateSettings(settings), &mut ctx).unwrap_err();
        assert!(matches!(err, GameError::InvalidSettings { .. }));
    }

    #[test]
    fn test_update_settings_normalizes_zero_card_limit() {
        let state = GameState::default();
        let mut rng = SequenceRandom::identity();
        let mut ctx = TransitionContext::new(&mut rng, 0);
        let settings = GameSettings {
            cards_per_round: Some(0),
            time_per_round: 45,
            ..Default::default()
        };

        let next = transition(&state, &GameAction::UpdateSettings(settings), &mut ctx).unwrap();
        assert_eq!(next.settings.cards_per_round, None);
        assert_eq!(next.round_time_remaining, 45);
    }
}

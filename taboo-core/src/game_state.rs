use taboo_types::{
    ContentSet, GameAction, GameError, GameSettings, GameState, Player, PlayerId, Team, TeamId,
};
use tracing::{debug, info, warn};

use crate::content::sanitize;
use crate::game_events::{StoreEvent, StoreEventBus, StoreObserver};
use crate::machine::{TransitionContext, transition};
use crate::random::{Clock, RandomSource, SystemClock, ThreadRandom};

/// Owns the authoritative game state and applies actions to it one at a time.
pub struct GameStore {
    state: GameState,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    event_bus: StoreEventBus,
}

impl GameStore {
    pub fn new(rng: Box<dyn RandomSource>, clock: Box<dyn Clock>) -> Self {
        Self::with_state(GameState::default(), rng, clock)
    }

    /// Resume from a rehydrated snapshot.
    pub fn with_state(
        state: GameState,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            state,
            rng,
            clock,
            event_bus: StoreEventBus::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.event_bus.subscribe(observer);
        debug!(observers = self.event_bus.len(), "Store observer subscribed");
    }

    pub fn clear_observers(&mut self) {
        self.event_bus.clear();
    }

    /// Applies `action`. On refusal the state is left exactly as it was.
    pub fn dispatch(&mut self, action: GameAction) -> Result<&GameState, GameError> {
        let now_millis = self.clock.now_millis();
        let mut ctx = TransitionContext::new(self.rng.as_mut(), now_millis);

        match transition(&self.state, &action, &mut ctx) {
            Ok(next) => {
                if next.status != self.state.status {
                    info!(
                        action = action.name(),
                        from = ?self.state.status,
                        to = ?next.status,
                        "Game status changed"
                    );
                } else {
                    debug!(action = action.name(), "Applied action");
                }
                self.state = next;
                self.event_bus.publish(StoreEvent::StateChanged {
                    action,
                    state: self.state.clone(),
                });
                Ok(&self.state)
            }
            Err(error) => {
                if error.is_precondition() {
                    warn!(action = action.name(), %error, "Action refused");
                } else {
                    debug!(action = action.name(), %error, "Action ignored");
                }
                self.event_bus.publish(StoreEvent::Rejected {
                    action,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    pub fn begin_content_load(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::BeginContentLoad)
    }

    /// Sanitizes provider output and installs it as the card and prenda pools.
    pub fn load_content(&mut self, content: ContentSet) -> Result<&GameState, GameError> {
        let content = sanitize(content);
        info!(
            cards = content.cards.len(),
            prendas = content.prendas.len(),
            "Content loaded"
        );
        self.dispatch(GameAction::ContentLoaded(content))
    }

    pub fn update_settings(&mut self, settings: GameSettings) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::UpdateSettings(settings))
    }

    pub fn add_team(&mut self, team: Team) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::AddTeam(team))
    }

    pub fn remove_team(&mut self, team_id: TeamId) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::RemoveTeam(team_id))
    }

    pub fn add_player(&mut self, player: Player) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::AddPlayer(player))
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::RemovePlayer(player_id))
    }

    pub fn start_game(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::StartGame)
    }

    pub fn start_round(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::StartRound)
    }

    pub fn end_round(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::EndRound)
    }

    pub fn tick(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::Tick)
    }

    pub fn next_turn(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::NextTurn)
    }

    pub fn restart_game(&mut self, reset_teams: bool) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::RestartGame { reset_teams })
    }

    pub fn score_card(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::ScoreCard)
    }

    pub fn skip_card(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::SkipCard)
    }

    pub fn record_refusal(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::RecordRefusal)
    }

    pub fn prenda_done(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::PrendaDone)
    }

    pub fn fail_prenda(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::FailPrenda)
    }

    pub fn declare_winner(&mut self, player_id: PlayerId) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::DeclareWinner(player_id))
    }

    pub fn declare_taboo(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::DeclareTaboo)
    }

    pub fn skip_round(&mut self) -> Result<&GameState, GameError> {
        self.dispatch(GameAction::SkipRound)
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(Box::new(ThreadRandom), Box::new(SystemClock))
    }
}

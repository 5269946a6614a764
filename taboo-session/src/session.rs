use std::sync::Arc;
use std::time::Duration;

use taboo_core::{GameStore, StoreEvent, StoreObserver};
use taboo_persistence::SnapshotRepository;
use taboo_types::{GameAction, GameError, GameState, GameStatus};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::content::{ContentProvider, load_or_empty};

struct SessionInner {
    store: GameStore,
    /// Ticker for the current stretch of `playing`; aborted as soon as the
    /// status leaves it.
    timer: Option<JoinHandle<()>>,
}

/// One shared-device game: the store behind a single lock, its round timer
/// and an optional snapshot persister.
pub struct GameSession {
    inner: Arc<RwLock<SessionInner>>,
    tick_interval: Duration,
    persister: Option<JoinHandle<()>>,
}

impl GameSession {
    pub fn new(store: GameStore, tick_interval: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                store,
                timer: None,
            })),
            tick_interval,
            persister: None,
        }
    }

    /// Like `new`, but every state change is saved under `session_key`.
    pub fn with_persistence(
        mut store: GameStore,
        tick_interval: Duration,
        repository: SnapshotRepository,
        session_key: String,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        store.subscribe(Box::new(SnapshotForwarder { sender }));

        let mut session = Self::new(store, tick_interval);
        session.persister = Some(tokio::spawn(run_persister(
            receiver,
            repository,
            session_key,
        )));
        session
    }

    pub async fn state(&self) -> GameState {
        self.inner.read().await.store.state().clone()
    }

    pub async fn is_timer_running(&self) -> bool {
        self.inner.read().await.timer.is_some()
    }

    /// Applies one action as a single read-modify-write under the lock.
    pub async fn dispatch(&self, action: GameAction) -> Result<GameState, GameError> {
        let mut inner = self.inner.write().await;
        let result = inner.store.dispatch(action).cloned();
        self.ensure_timer(&mut inner);
        result
    }

    pub async fn load_content(
        &self,
        provider: &dyn ContentProvider,
    ) -> Result<GameState, GameError> {
        self.dispatch(GameAction::BeginContentLoad).await?;
        let content = load_or_empty(provider).await;

        let mut inner = self.inner.write().await;
        let result = inner.store.load_content(content).cloned();
        self.ensure_timer(&mut inner);
        result
    }

    /// Restarts the round timer for a session rehydrated mid-round.
    pub async fn resume(&self) {
        let mut inner = self.inner.write().await;
        if inner.store.state().status == GameStatus::Playing {
            info!(
                remaining = inner.store.state().round_time_remaining,
                "Resuming round in progress"
            );
        }
        self.ensure_timer(&mut inner);
    }

    /// Detaches the persister and waits for it to write the last snapshot.
    pub async fn shutdown(mut self) {
        {
            let mut inner = self.inner.write().await;
            inner.store.clear_observers();
            if let Some(timer) = inner.timer.take() {
                timer.abort();
            }
        }
        if let Some(handle) = self.persister.take() {
            if let Err(e) = handle.await {
                error!("Snapshot persister failed: {}", e);
            }
        }
        info!("Session shut down");
    }

    fn ensure_timer(&self, inner: &mut SessionInner) {
        if inner.store.state().status != GameStatus::Playing {
            if let Some(timer) = inner.timer.take() {
                timer.abort();
                debug!("Round timer stopped");
            }
            return;
        }
        if inner.timer.is_none() {
            inner.timer = Some(tokio::spawn(run_timer(
                self.inner.clone(),
                self.tick_interval,
            )));
        }
    }
}

/// Ticks once per period until one of its own ticks ends the round. Any
/// other exit from `playing` aborts it under the lock.
async fn run_timer(inner: Arc<RwLock<SessionInner>>, period: Duration) {
    debug!("Round timer started");
    loop {
        tokio::time::sleep(period).await;

        let mut guard = inner.write().await;
        let _ = guard.store.tick();
        if guard.store.state().status != GameStatus::Playing {
            guard.timer = None;
            break;
        }
    }
    debug!("Round timer stopped");
}

struct SnapshotForwarder {
    sender: mpsc::UnboundedSender<GameState>,
}

impl StoreObserver for SnapshotForwarder {
    fn on_event(&mut self, event: &StoreEvent) {
        if let StoreEvent::StateChanged { state, .. } = event {
            // The receiver only goes away at shutdown.
            let _ = self.sender.send(state.clone());
        }
    }
}

/// Saves the newest queued snapshot; older ones still queued are skipped.
async fn run_persister(
    mut receiver: mpsc::UnboundedReceiver<GameState>,
    repository: SnapshotRepository,
    session_key: String,
) {
    while let Some(mut state) = receiver.recv().await {
        while let Ok(newer) = receiver.try_recv() {
            state = newer;
        }
        if let Err(e) = repository.save_snapshot(&session_key, &state).await {
            error!("Failed to save snapshot for {}: {:#}", session_key, e);
        }
    }
    debug!("Snapshot persister drained");
}

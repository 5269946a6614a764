use taboo_types::{GameAction, GameError, GameState};

#[derive(Debug, Clone)]
pub enum StoreEvent {
    StateChanged {
        action: GameAction,
        state: GameState,
    },
    Rejected {
        action: GameAction,
        error: GameError,
    },
}

impl StoreEvent {
    pub fn action(&self) -> &GameAction {
        match self {
            StoreEvent::StateChanged { action, .. } => action,
            StoreEvent::Rejected { action, .. } => action,
        }
    }
}

/// Observer hook run after every dispatch, e.g. to persist snapshots.
pub trait StoreObserver: Send + Sync {
    fn on_event(&mut self, event: &StoreEvent);
}

/// Simple event bus for distributing store events
pub struct StoreEventBus {
    observers: Vec<Box<dyn StoreObserver>>,
}

impl StoreEventBus {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn publish(&mut self, event: StoreEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl Default for StoreEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StoreObserver for Recorder {
        fn on_event(&mut self, event: &StoreEvent) {
            self.events.lock().unwrap().push(event.action().name());
        }
    }

    #[test]
    fn test_event_bus_fans_out() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StoreEventBus::new();
        bus.subscribe(Box::new(Recorder {
            events: events.clone(),
        }));
        bus.subscribe(Box::new(Recorder {
            events: events.clone(),
        }));

        bus.publish(StoreEvent::Rejected {
            action: GameAction::StartGame,
            error: GameError::EmptyCardPool,
        });

        assert_eq!(*events.lock().unwrap(), vec!["start_game", "start_game"]);
    }

    #[test]
    fn test_clear_detaches_observers() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut bus = StoreEventBus::new();
        bus.subscribe(Box::new(Recorder {
            events: events.clone(),
        }));
        assert_eq!(bus.len(), 1);
        bus.clear();

        bus.publish(StoreEvent::StateChanged {
            action: GameAction::Tick,
            state: GameState::default(),
        });

        assert!(bus.is_empty());
        assert!(events.lock().unwrap().is_empty());
    }
}

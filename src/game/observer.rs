//! Game state observers
//!
//! Observers are invoked synchronously, in registration order, at the end of
//! every tick and once more when the session ends. They run on the tick task
//! while the session is locked, so they must not call back into the engine.

use std::sync::Arc;

use crate::game::snapshot::GameStateSnapshot;

pub trait GameStateObserver: Send + Sync {
    fn on_game_state_update(&self, state: &GameStateSnapshot);
}

impl<F> GameStateObserver for F
where
    F: Fn(&GameStateSnapshot) + Send + Sync,
{
    fn on_game_state_update(&self, state: &GameStateSnapshot) {
        self(state)
    }
}

/// Handle returned on registration, used to remove an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered observer list
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Arc<dyn GameStateObserver>)>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Arc<dyn GameStateObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the id was not registered
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn notify(&self, state: &GameStateSnapshot) {
        for (_, observer) in &self.observers {
            observer.on_game_state_update(state);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

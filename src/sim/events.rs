//! Simulation events and their delivery
//!
//! A tick collects its outcomes into a list of [`GameEvent`]s. Once the tick
//! is done the list is handed to every registered observer, in registration
//! order, and each observer sees the events in the order they happened.

use serde::{Deserialize, Serialize};

use super::planet::EntityId;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `by` swallowed `victim` and grew
    SwallowedOther { by: EntityId, victim: EntityId },
    /// `victim` was swallowed by `by` and is now dead
    WasSwallowed { victim: EntityId, by: EntityId },
    /// The black hole reached its target radius
    ArenaCollapsed,
    /// A dead planet came back
    Respawned { id: EntityId },
    /// A new round began (arena reset)
    RoundReset,
    RewindStarted,
    RewindStopped,
}

/// Subscriber to simulation events (audio, effects, UI, reward bookkeeping)
pub trait EventObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Ordered, synchronous event fan-out
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn EventObserver>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it runs after every observer added before it
    pub fn subscribe(&mut self, observer: impl EventObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver events, observer by observer
    pub fn publish(&mut self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        for observer in &mut self.observers {
            for event in events {
                observer.on_event(event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Observer that writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl EventObserver for LogObserver {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SwallowedOther { by, victim } => {
                log::debug!("Planet {} swallowed planet {}", by.0, victim.0)
            }
            GameEvent::WasSwallowed { .. } => {}
            GameEvent::ArenaCollapsed => log::info!("Black hole reached the arena limit"),
            GameEvent::Respawned { id } => log::debug!("Planet {} respawned", id.0),
            GameEvent::RoundReset => log::info!("Round reset"),
            GameEvent::RewindStarted => log::info!("Rewind started"),
            GameEvent::RewindStopped => log::info!("Rewind stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_observers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&log);
        bus.subscribe(move |e: &GameEvent| first.borrow_mut().push(("first", *e)));
        let second = Rc::clone(&log);
        bus.subscribe(move |e: &GameEvent| second.borrow_mut().push(("second", *e)));

        let events = [
            GameEvent::SwallowedOther { by: EntityId(1), victim: EntityId(2) },
            GameEvent::WasSwallowed { victim: EntityId(2), by: EntityId(1) },
        ];
        bus.publish(&events);

        let seen = log.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], ("first", events[0]));
        assert_eq!(seen[1], ("first", events[1]));
        assert_eq!(seen[2], ("second", events[0]));
        assert_eq!(seen[3], ("second", events[1]));
    }

    #[test]
    fn test_empty_publish_is_silent() {
        let calls = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&calls);
        bus.subscribe(move |_: &GameEvent| *c.borrow_mut() += 1);
        bus.publish(&[]);
        assert_eq!(*calls.borrow(), 0);
    }
}

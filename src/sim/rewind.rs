//! Time rewind
//!
//! While the simulation runs, every tick records a [`Snapshot`] of each
//! participating body. Rewinding pops snapshots newest-first and restores
//! them, one per tick, until the history runs dry or the rewind is stopped.
//!
//! The engine only sees [`TimeBody`] trait objects and opaque [`Memento`]
//! values; each body kind decides what it captures.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::planet::{Color, EntityId, TagMask};

/// Which part of an entity a memento belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Planet,
    Player,
    Badge,
}

/// Identity of one rewindable body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyKey {
    pub entity: EntityId,
    pub kind: BodyKind,
}

impl BodyKey {
    pub fn new(entity: EntityId, kind: BodyKind) -> Self {
        Self { entity, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetMemento {
    pub center: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub target_radius: f32,
    pub growth_rate: f32,
    pub color: Color,
    pub dead: bool,
    pub rival_tags: TagMask,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMemento {
    pub score: f32,
    pub move_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BadgeMemento {
    pub alpha: f32,
}

/// Saved state of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Memento {
    Planet(PlanetMemento),
    Player(PlayerMemento),
    Badge(BadgeMemento),
}

/// Something the rewind engine can save and restore
pub trait TimeBody {
    /// Called once when a rewind begins
    fn rewind_started(&mut self) {}

    /// Called once when a rewind ends
    fn rewind_stopped(&mut self) {}

    fn capture(&self) -> Memento;

    /// Restore from a memento captured by this body kind. Mementos of
    /// another kind are ignored.
    fn restore(&mut self, memento: &Memento);
}

/// A collection of rewindable bodies
pub trait Timeline {
    fn visit_bodies(&self, visit: &mut dyn FnMut(BodyKey, &dyn TimeBody));
    fn visit_bodies_mut(&mut self, visit: &mut dyn FnMut(BodyKey, &mut dyn TimeBody));
}

/// Every body's memento at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: Vec<(BodyKey, Memento)>,
}

impl Snapshot {
    pub fn capture<T: Timeline + ?Sized>(timeline: &T) -> Self {
        let mut entries = Vec::new();
        timeline.visit_bodies(&mut |key, body| entries.push((key, body.capture())));
        entries.sort_by_key(|(key, _)| *key);
        Self { entries }
    }

    pub fn get(&self, key: BodyKey) -> Option<&Memento> {
        self.entries
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore every body present in the snapshot. Bodies created after the
    /// snapshot was taken are left alone.
    pub fn restore<T: Timeline + ?Sized>(&self, timeline: &mut T) {
        timeline.visit_bodies_mut(&mut |key, body| {
            if let Some(memento) = self.get(key) {
                body.restore(memento);
            }
        });
    }
}

/// Bounded history of snapshots plus the rewinding flag
#[derive(Debug, Clone)]
pub struct RewindEngine {
    history: VecDeque<Snapshot>,
    capacity: usize,
    rewinding: bool,
}

impl RewindEngine {
    /// Keep at most `capacity` snapshots (oldest dropped first)
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            rewinding: false,
        }
    }

    /// Capacity for `seconds` of history at a fixed timestep.
    ///
    /// Snapshots are taken at the start of each running tick, so
    /// `round(seconds / dt)` of them span exactly `seconds`: the oldest is
    /// the state `seconds` ago and the live state is never stored.
    pub fn for_duration(seconds: f32, dt: f32) -> Self {
        Self::new((seconds / dt).round().max(0.0) as usize)
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewinding
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Enter rewind mode; returns false if already rewinding
    pub fn begin<T: Timeline + ?Sized>(&mut self, timeline: &mut T) -> bool {
        if self.rewinding {
            return false;
        }
        timeline.visit_bodies_mut(&mut |_, body| body.rewind_started());
        self.rewinding = true;
        log::info!("Rewind started ({} snapshots available)", self.history.len());
        true
    }

    /// Leave rewind mode; returns false if not rewinding
    pub fn end<T: Timeline + ?Sized>(&mut self, timeline: &mut T) -> bool {
        if !self.rewinding {
            return false;
        }
        self.rewinding = false;
        timeline.visit_bodies_mut(&mut |_, body| body.rewind_stopped());
        log::info!("Rewind stopped ({} snapshots left)", self.history.len());
        true
    }

    /// Push the current state, evicting the oldest snapshot when full
    pub fn record<T: Timeline + ?Sized>(&mut self, timeline: &T) {
        if self.capacity == 0 {
            return;
        }
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(Snapshot::capture(timeline));
    }

    /// Restore and drop the newest snapshot; false when history is empty
    pub fn step_back<T: Timeline + ?Sized>(&mut self, timeline: &mut T) -> bool {
        match self.history.pop_back() {
            Some(snapshot) => {
                snapshot.restore(timeline);
                true
            }
            None => false,
        }
    }
}

//! The black hole
//!
//! The black hole is an ordinary combatant whose planet has no radius
//! ceiling. This module tracks the end-of-round condition: once the hole
//! has grown to its target the arena has collapsed.

use glam::Vec3;

use super::planet::{EntityId, Planet};
use super::state::SimulationClock;
use crate::consts::*;

/// End-of-round tracker for the black hole combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlackHole {
    id: EntityId,
    collapsed: bool,
}

impl BlackHole {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            collapsed: false,
        }
    }

    /// A fresh black hole planet at the seed radius
    pub fn spawn_planet(center: Vec3) -> Planet {
        Planet::black_hole(center, BLACK_HOLE_SEED_RADIUS)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the collapse has already been reported this round
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The hole has reached its target radius
    pub fn end_condition(planet: &Planet) -> bool {
        planet.radius() >= planet.target_radius()
    }

    /// Check the end condition; returns true on the tick it first holds.
    ///
    /// Does nothing while the simulation is paused. The latch re-arms as
    /// soon as the hole is below its target again (new round or rewind).
    pub fn update(&mut self, planet: &Planet, clock: &SimulationClock) -> bool {
        if !planet.can_update(clock) {
            return false;
        }
        if !Self::end_condition(planet) {
            self.collapsed = false;
            return false;
        }
        if self.collapsed {
            return false;
        }
        self.collapsed = true;
        log::info!("Black hole collapsed the arena at radius {}", planet.radius());
        true
    }
}

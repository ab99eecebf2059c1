//! Observation and state comparison for an external learner
//!
//! The learner itself (policy, rewards, training) lives outside the crate.
//! This module only exposes what it looks at each tick and how two
//! consecutive looks compare.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::planet::EntityId;
use super::state::World;

/// What an externally driven planet sees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub self_center: Vec3,
    pub self_radius: f32,
    /// Nearest rival's center, if there is one
    pub rival_center: Option<Vec3>,
    pub rival_radius: Option<f32>,
    pub distance_to_black_hole: f32,
}

impl Observation {
    /// Flat feature vector; a missing rival reads as zeros
    pub fn as_array(&self) -> [f32; 9] {
        let rival = self.rival_center.unwrap_or(Vec3::ZERO);
        [
            self.self_center.x,
            self.self_center.y,
            self.self_center.z,
            rival.x,
            rival.y,
            rival.z,
            self.self_radius,
            self.rival_radius.unwrap_or(0.0),
            self.distance_to_black_hole,
        ]
    }
}

/// The situation of one planet at one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningState {
    pub closest_rival: Option<EntityId>,
    /// Surface gap to the closest rival (0 without one)
    pub distance_to_rival: f32,
    pub can_swallow_rival: bool,
    pub distance_to_black_hole: f32,
}

/// Change between two consecutive states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    /// Both states track the same rival
    pub same_rival: bool,
    /// Current minus previous rival gap
    pub rival_distance_change: f32,
    /// Current minus previous black hole gap
    pub black_hole_distance_change: f32,
    pub can_swallow_before: bool,
    pub can_swallow_now: bool,
}

impl StateDelta {
    /// Same rival, same dominance: the planet kept doing one thing
    pub fn same_action(&self) -> bool {
        self.same_rival && self.can_swallow_before == self.can_swallow_now
    }

    /// Closing in on prey, or pulling away from a threat
    pub fn improved(&self) -> bool {
        if self.can_swallow_now {
            self.rival_distance_change < 0.0
        } else {
            self.rival_distance_change > 0.0
        }
    }
}

impl World {
    /// What `id` sees this tick; `None` for unknown or dead planets
    pub fn observe(&self, id: EntityId) -> Option<Observation> {
        let me = self.get(id).filter(|c| c.is_alive())?;
        let rival = self.closest_rival(id);
        Some(Observation {
            self_center: me.planet.center,
            self_radius: me.planet.radius(),
            rival_center: rival.as_ref().map(|r| r.planet.center),
            rival_radius: rival.as_ref().map(|r| r.planet.radius()),
            distance_to_black_hole: self.distance_to_black_hole(id),
        })
    }
}

impl LearningState {
    /// Snapshot the situation of `id`; `None` for unknown or dead planets
    pub fn capture(world: &World, id: EntityId) -> Option<Self> {
        let me = world.get(id).filter(|c| c.is_alive())?;
        let info = world.closest_rival(id);

        Some(Self {
            closest_rival: info.as_ref().map(|i| i.rival),
            distance_to_rival: info
                .as_ref()
                .map(|i| i.planet.distance_to(&me.planet))
                .unwrap_or(0.0),
            can_swallow_rival: me.can_swallow(info.as_ref()),
            distance_to_black_hole: world.distance_to_black_hole(id),
        })
    }

    pub fn compare(&self, previous: &Self) -> StateDelta {
        let black_hole_distance_change =
            if self.distance_to_black_hole == f32::MAX || previous.distance_to_black_hole == f32::MAX {
                0.0
            } else {
                self.distance_to_black_hole - previous.distance_to_black_hole
            };

        StateDelta {
            same_rival: self.closest_rival.is_some() && self.closest_rival == previous.closest_rival,
            rival_distance_change: self.distance_to_rival - previous.distance_to_rival,
            black_hole_distance_change,
            can_swallow_before: previous.can_swallow_rival,
            can_swallow_now: self.can_swallow_rival,
        }
    }
}

//! Built-in steering for computer-controlled planets
//!
//! Stateless: the movement vector is recomputed from scratch every tick.
//! It is the sum of a push away from the black hole and a term that chases
//! a weaker rival or flees a stronger one.

use glam::Vec3;
use rand::Rng;

use super::arena::{Arena, random_in_unit_sphere};
use super::combatant::{ClosePlayerInfo, Combatant};
use super::planet::Planet;
use crate::consts::*;
use crate::{orthogonal, project_on_plane};

/// Steering tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiPolicy {
    /// Chase rivals that can be swallowed
    pub can_attack: bool,
    /// Cap on the black hole repulsion
    pub max_force: f32,
    /// Size of the random offset added to every move
    pub jitter: f32,
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self {
            can_attack: true,
            max_force: AI_MAX_FORCE,
            jitter: AI_JITTER,
        }
    }
}

impl AiPolicy {
    pub fn new(can_attack: bool) -> Self {
        Self {
            can_attack,
            ..Default::default()
        }
    }

    /// Radial push away from the arena center, inverse-square in the gap to
    /// the black hole
    pub fn black_hole_repulsion(&self, planet: &Planet, arena: &Arena, black_hole: Option<&Planet>) -> Vec3 {
        let distance = arena.distance_to_black_hole(planet, black_hole);
        let force = if distance < 1.0 {
            self.max_force
        } else {
            (self.max_force / (distance * distance)).min(self.max_force)
        };
        (planet.center - arena.center).normalize_or_zero() * force
    }

    /// Chase a weaker rival, flee a visible stronger one
    pub fn rival_term(&self, me: &Combatant, rival: &ClosePlayerInfo, black_hole_center: Vec3) -> Vec3 {
        let here = me.planet.center;
        let there = rival.planet.center;

        if me.can_swallow(Some(rival)) {
            if !self.can_attack {
                return Vec3::ZERO;
            }
            if rival.occluded_by_black_hole {
                around_black_hole(here, there, black_hole_center)
            } else {
                (there - here).normalize_or_zero()
            }
        } else if !rival.occluded_by_black_hole {
            (here - there).normalize_or_zero()
        } else {
            // Can't see it, so don't run from it
            Vec3::ZERO
        }
    }

    /// Movement before jitter
    pub fn movement(
        &self,
        me: &Combatant,
        arena: &Arena,
        black_hole: Option<&Planet>,
        rival: Option<&ClosePlayerInfo>,
    ) -> Vec3 {
        let mut movement = self.black_hole_repulsion(&me.planet, arena, black_hole);
        if let Some(rival) = rival {
            let hole_center = black_hole.map(|h| h.center).unwrap_or(Vec3::ZERO);
            movement += self.rival_term(me, rival, hole_center);
        }
        movement
    }

    /// Final move for this tick, jittered; `None` means stand still
    pub fn decide<R: Rng>(
        &self,
        me: &Combatant,
        arena: &Arena,
        black_hole: Option<&Planet>,
        rival: Option<&ClosePlayerInfo>,
        rng: &mut R,
    ) -> Option<Vec3> {
        let movement = self.movement(me, arena, black_hole, rival);
        if movement == Vec3::ZERO {
            return None;
        }
        Some(movement + random_in_unit_sphere(rng) * self.jitter)
    }
}

/// Heading along the black hole's surface toward `there`.
///
/// Projects the direction to the target onto the plane tangent to the hole
/// below `here`. When the target sits straight along the normal the
/// projection vanishes and any tangent direction will do.
///
/// The fallback is chosen by the length of the projected tangent, not by
/// the angle between the normal and the target direction. A target a
/// hair off the normal still yields its own tangent once the projection
/// is longer than `AI_TANGENT_EPSILON`.
pub fn around_black_hole(here: Vec3, there: Vec3, black_hole_center: Vec3) -> Vec3 {
    let normal = (here - black_hole_center).normalize_or_zero();
    let to_target = (there - here).normalize_or_zero();
    let tangent = project_on_plane(to_target, normal);

    if tangent.length() < AI_TANGENT_EPSILON {
        orthogonal(normal).normalize_or_zero()
    } else {
        tangent.normalize()
    }
}

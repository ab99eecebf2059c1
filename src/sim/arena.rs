//! The spherical arena
//!
//! Holds the boundary, spawn sampling, and the wall bounce. The black hole is
//! not owned here; callers pass its planet in when the math needs it.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::planet::Planet;
use crate::consts::*;

/// Arena boundary (fixed after construction)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec3,
    pub radius: f32,
}

/// Result of checking a planet against the arena wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Unit vector from the planet toward the arena center
    pub inward: Vec3,
    /// Velocity after the bounce (unchanged when not moving outward)
    pub velocity: Vec3,
    /// Whether the velocity was reflected
    pub bounced: bool,
    /// How far the planet pokes past the wall
    pub penetration: f32,
}

impl Arena {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Radius the black hole grows toward: stops short of the wall by a
    /// margin of max planet radii
    pub fn black_hole_target_radius(&self, max_planet_radius: f32) -> f32 {
        self.radius - BLACK_HOLE_WALL_MARGIN * max_planet_radius
    }

    /// Restart the black hole from its seed radius and aim it at the wall
    pub fn reset(&self, black_hole: &mut Planet, max_planet_radius: f32) {
        black_hole.set_radius(BLACK_HOLE_SEED_RADIUS);
        black_hole.set_target_radius(self.black_hole_target_radius(max_planet_radius));
        log::info!(
            "Arena reset: black hole {} -> {}",
            black_hole.radius(),
            black_hole.target_radius()
        );
    }

    /// Surface gap to the black hole, effectively infinite without one
    pub fn distance_to_black_hole(&self, planet: &Planet, black_hole: Option<&Planet>) -> f32 {
        match black_hole {
            Some(hole) => planet.distance_to(hole),
            None => f32::MAX,
        }
    }

    /// A center for a planet of `radius` that sits fully inside the arena and
    /// fully outside the black hole.
    ///
    /// Picks a random direction out of the black hole and a uniform offset
    /// between the hole's surface and the arena wall along it. If there is no
    /// room for the planet the point lands between the two bounds anyway.
    pub fn valid_random_point_for<R: Rng>(
        &self,
        radius: f32,
        black_hole: Option<&Planet>,
        rng: &mut R,
    ) -> Vec3 {
        let dir = random_unit_vector(rng);
        let (hole_center, hole_radius) = black_hole
            .map(|h| (h.center, h.radius()))
            .unwrap_or((Vec3::ZERO, 0.0));

        let min_point = hole_center + dir * (hole_radius + radius);
        let max_point = hole_center + dir * (self.radius - radius);
        min_point + (max_point - min_point) * rng.random::<f32>()
    }

    /// Bounce a planet that is crossing the wall while moving outward.
    ///
    /// Returns `None` when the planet is fully inside (or exactly at the
    /// center). Otherwise the contact carries the new velocity; the caller
    /// is expected to steer the planet along `inward` as well.
    pub fn enforce_containment(&self, planet: &Planet) -> Option<WallContact> {
        let to_center = self.center - planet.center;
        let dist = to_center.length();
        if dist <= f32::EPSILON {
            return None;
        }

        let penetration = dist + planet.radius() - self.radius;
        if penetration <= 0.0 {
            return None;
        }

        let inward = to_center / dist;
        let moving_out = planet.velocity.dot(-to_center) > 0.0;
        let velocity = if moving_out {
            crate::reflect(planet.velocity, inward) * WALL_DAMPING
        } else {
            planet.velocity
        };

        Some(WallContact {
            inward,
            velocity,
            bounced: moving_out,
            penetration,
        })
    }

    /// Whether a sphere is fully inside the arena
    pub fn contains(&self, center: Vec3, radius: f32) -> bool {
        center.distance(self.center) + radius <= self.radius
    }
}

/// Uniform point inside the unit sphere
pub fn random_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Uniform direction on the unit sphere
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        if let Some(dir) = crate::normalize_or_none(random_in_unit_sphere(rng)) {
            return dir;
        }
    }
}

//! Growable planets
//!
//! A planet is a sphere whose radius animates toward a target radius. Every
//! other part of the simulation (swallowing, the black hole, rewind) works by
//! reading or nudging these values.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rewind::{Memento, PlanetMemento, TimeBody};
use super::state::SimulationClock;
use crate::consts::*;

/// Stable entity handle (assigned in spawn order, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision channels, standing in for engine layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TagMask(pub u32);

impl TagMask {
    pub const NONE: Self = Self(0);
    pub const BLACK_HOLE: Self = Self(1 << 0);
    pub const PLAYER: Self = Self(1 << 1);
    pub const SUBS: Self = Self(1 << 2);
    /// Subscriber planets only the smallest planet may absorb
    pub const MY_SUBS: Self = Self(1 << 3);

    /// Channels every ordinary planet scans for rivals
    pub const PLANETS: Self = Self(Self::PLAYER.0 | Self::SUBS.0);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Per-channel linear blend, `t` clamped to [0, 1]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn rgb_vec(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

/// A growable sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub center: Vec3,
    /// Rigid-body velocity (integrated by the physics collaborator)
    pub velocity: Vec3,
    radius: f32,
    target_radius: f32,
    /// Radius units gained per second while below target
    pub growth_rate: f32,
    pub color: Color,
    dead: bool,
    /// Black hole flag: no radius ceiling
    unbounded: bool,
    max_radius: f32,
    /// Frozen by the rewind engine; ignores movement while set
    pub kinematic: bool,
    /// Disabled planets are never offered as rivals
    pub active: bool,
    /// Channel this planet lives on
    pub tag: TagMask,
    /// Channels scanned when looking for rivals
    pub rival_tags: TagMask,
}

impl Planet {
    /// A bounded planet at `center` with the given radius
    pub fn new(center: Vec3, radius: f32, max_radius: f32) -> Self {
        let mut planet = Self {
            center,
            velocity: Vec3::ZERO,
            radius: 0.0,
            target_radius: 0.0,
            growth_rate: PLANET_GROWTH_RATE,
            color: Color::RED,
            dead: false,
            unbounded: false,
            max_radius,
            kinematic: false,
            active: true,
            tag: TagMask::SUBS,
            rival_tags: TagMask::PLANETS,
        };
        planet.set_radius(radius);
        planet
    }

    /// The black hole's planet: unbounded growth, scans every planet channel
    pub fn black_hole(center: Vec3, radius: f32) -> Self {
        let mut planet = Self::new(center, 0.0, f32::MAX);
        planet.unbounded = true;
        planet.color = Color::BLACK;
        planet.tag = TagMask::BLACK_HOLE;
        planet.rival_tags = TagMask::PLANETS.union(TagMask::MY_SUBS);
        planet.set_radius(radius);
        planet
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn is_black_hole(&self) -> bool {
        self.unbounded
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Live and the clock is running
    pub fn can_update(&self, clock: &SimulationClock) -> bool {
        clock.running && !self.dead
    }

    /// Mass proxy used by steering
    pub fn mass(&self) -> f32 {
        (self.radius / MASS_PER_RADIUS).max(MIN_MASS)
    }

    /// Bounded planets stay within [0, max_radius]; the black hole is free
    pub fn clamp_radius(&self, value: f32) -> f32 {
        if self.unbounded {
            value
        } else {
            value.clamp(0.0, self.max_radius)
        }
    }

    /// Jump to a radius immediately (current and target)
    pub fn set_radius(&mut self, radius: f32) {
        let radius = self.clamp_radius(radius);
        self.radius = radius;
        self.target_radius = radius;
    }

    /// Set the radius to animate toward
    pub fn set_target_radius(&mut self, target: f32) {
        self.target_radius = self.clamp_radius(target);
    }

    /// Write current and target radius verbatim (rewind restore only)
    pub(crate) fn restore_radii(&mut self, radius: f32, target_radius: f32) {
        self.radius = radius;
        self.target_radius = target_radius;
    }

    /// Grow toward the target by at most `growth_rate * dt`
    pub fn advance(&mut self, dt: f32) {
        if self.radius < self.target_radius {
            let next = (self.radius + self.growth_rate * dt).min(self.target_radius);
            self.radius = self.clamp_radius(next);
        }
    }

    /// Gap between surfaces (negative when overlapping)
    pub fn distance_to(&self, other: &Planet) -> f32 {
        self.center.distance(other.center) - (self.radius + other.radius)
    }

    pub fn die(&mut self) {
        self.dead = true;
    }

    pub fn revive(&mut self) {
        self.dead = false;
    }
}

impl TimeBody for Planet {
    fn rewind_started(&mut self) {
        if !self.unbounded {
            self.kinematic = true;
        }
    }

    fn rewind_stopped(&mut self) {
        if !self.unbounded {
            self.kinematic = false;
        }
    }

    fn capture(&self) -> Memento {
        Memento::Planet(PlanetMemento {
            center: self.center,
            velocity: self.velocity,
            radius: self.radius,
            target_radius: self.target_radius,
            growth_rate: self.growth_rate,
            color: self.color,
            dead: self.dead,
            rival_tags: self.rival_tags,
        })
    }

    fn restore(&mut self, memento: &Memento) {
        let Memento::Planet(m) = memento else {
            return;
        };
        self.center = m.center;
        self.velocity = m.velocity;
        self.restore_radii(m.radius, m.target_radius);
        self.growth_rate = m.growth_rate;
        self.color = m.color;
        self.rival_tags = m.rival_tags;
        if self.dead != m.dead {
            if m.dead { self.die() } else { self.revive() }
        }
    }
}

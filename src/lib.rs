//! Event Horizon - planets swallowing planets around a growing black hole
//!
//! Core modules:
//! - `sim`: Deterministic simulation (growth, swallowing, AI, rewind)
//! - `settings`: Game configuration loaded at startup
//! - `error`: Configuration errors
//! - `logging`: Logger bootstrap for native runners

pub mod error;
pub mod logging;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::GameConfig;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Radius the black hole is reset to at the start of a round
    pub const BLACK_HOLE_SEED_RADIUS: f32 = 50.0;
    /// Black hole stops this many max planet radii short of the arena wall
    pub const BLACK_HOLE_WALL_MARGIN: f32 = 2.2;

    /// Default radius growth (units per second)
    pub const PLANET_GROWTH_RATE: f32 = 7.0;
    /// Rival center must be this fraction of its radius inside the swallower
    pub const SWALLOW_DEPTH_FACTOR: f32 = 0.5;
    /// Mass proxy is radius divided by this
    pub const MASS_PER_RADIUS: f32 = 10.0;
    /// Floor for the mass proxy so zero-radius planets stay finite
    pub const MIN_MASS: f32 = 0.01;
    /// Velocity change per move = move_speed / (mass * this)
    pub const MOVE_MASS_FACTOR: f32 = 0.06;
    /// Default move speed for every combatant
    pub const MOVE_SPEED: f32 = 0.1;

    /// Speed kept after bouncing off the arena wall
    pub const WALL_DAMPING: f32 = 0.9;

    /// AI black hole repulsion cap
    pub const AI_MAX_FORCE: f32 = 50.0;
    /// AI jitter scale (random offset inside unit sphere)
    pub const AI_JITTER: f32 = 0.3;
    /// Tangent projections shorter than this fall back to an orthogonal
    pub const AI_TANGENT_EPSILON: f32 = 0.01;

    /// External (learned) actions are scaled by this before moving
    pub const AGENT_ACTION_SCALE: f32 = 2.0;

    /// Badge alpha after being swallowed
    pub const DEFEATED_BADGE_ALPHA: f32 = 0.15;

    /// Seconds of history kept for rewind
    pub const RECORD_SECONDS: f32 = 20.0;

    /// Specular color used for every rendered sphere
    pub const SPECULAR_GREY: f32 = 0.8;
}

/// Normalize, or `None` for (near) zero-length vectors
#[inline]
pub fn normalize_or_none(v: Vec3) -> Option<Vec3> {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO { None } else { Some(n) }
}

/// Some vector orthogonal to `v` (zeroes the smallest component)
pub fn orthogonal(v: Vec3) -> Vec3 {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    if ax <= ay && ax <= az {
        Vec3::new(0.0, -v.z, v.y)
    } else if ay <= ax && ay <= az {
        Vec3::new(-v.z, 0.0, v.x)
    } else {
        Vec3::new(-v.y, v.x, 0.0)
    }
}

/// Remove the component of `v` along `normal` (normal need not be unit)
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < f32::EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / len_sq)
}

/// Reflect `v` off a surface with unit `normal`: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_is_perpendicular() {
        for v in [
            Vec3::X,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 0.5, 0.1),
            Vec3::new(0.0, 0.0, 7.0),
        ] {
            let o = orthogonal(v);
            assert!(o.length() > 0.0);
            assert!(o.dot(v).abs() < 1e-5);
        }
    }

    #[test]
    fn test_project_on_plane() {
        let v = Vec3::new(3.0, 4.0, 5.0);
        let p = project_on_plane(v, Vec3::Z * 2.0);
        assert_eq!(p, Vec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(100.0, 0.0, 0.0);
        let r = reflect(v, Vec3::new(-1.0, 0.0, 0.0));
        assert!((r.x + 100.0).abs() < 0.001);
        assert!(r.y.abs() < 0.001);
    }

    #[test]
    fn test_normalize_or_none() {
        assert!(normalize_or_none(Vec3::ZERO).is_none());
        let n = normalize_or_none(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(n, Some(Vec3::Y));
    }
}

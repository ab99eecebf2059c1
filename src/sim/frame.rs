//! Per-frame data for an external renderer
//!
//! The simulation never draws. A renderer pulls these plain structs after
//! each tick: one sphere per live planet plus the parameters for the
//! distortion shader centered on the locally controlled planet.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::combatant::Driver;
use super::state::World;
use crate::consts::*;

/// One sphere to ray trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSphere {
    pub position: Vec3,
    pub radius: f32,
    pub albedo: Vec3,
    pub specular: Vec3,
}

/// Shader uniforms for the human planet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaderParams {
    pub center: Vec3,
    pub radius: f32,
}

impl World {
    /// Spheres for every live, active planet in id order
    pub fn render_spheres(&self) -> Vec<RenderSphere> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive() && c.planet.active)
            .map(|c| RenderSphere {
                position: c.planet.center,
                radius: c.planet.radius(),
                albedo: c.planet.color.rgb_vec(),
                specular: Vec3::splat(SPECULAR_GREY),
            })
            .collect()
    }

    /// Parameters for the first live human planet, if any
    pub fn shader_params(&self) -> Option<ShaderParams> {
        self.combatants
            .iter()
            .find(|c| c.driver == Driver::Human && c.is_alive())
            .map(|c| ShaderParams {
                center: c.planet.center,
                radius: c.planet.radius(),
            })
    }
}

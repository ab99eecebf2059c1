//! Spatial queries
//!
//! Broad-phase overlap and ray queries belong to the physics engine. The
//! simulation only talks to [`SpatialQuery`]; [`SphereScan`] is the
//! reference provider used headlessly and in tests.

use glam::Vec3;

use super::planet::{EntityId, Planet, TagMask};

/// A sphere collider as seen by the query provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: EntityId,
    pub center: Vec3,
    pub radius: f32,
    pub tag: TagMask,
}

/// Queries the simulation issues against the physics world
pub trait SpatialQuery {
    /// Ids of colliders overlapping the sphere whose tag is in `mask`
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: TagMask) -> Vec<EntityId>;

    /// Whether a ray hits any collider in `mask` within `max_distance`.
    ///
    /// `direction` need not be normalized. Colliders containing `origin` are
    /// not hit.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: TagMask) -> bool;
}

/// Brute-force provider over a flat collider list
#[derive(Debug, Clone, Default)]
pub struct SphereScan {
    colliders: Vec<Collider>,
}

impl SphereScan {
    pub fn new(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    /// Build colliders for every live, active planet
    pub fn from_planets<'a>(planets: impl IntoIterator<Item = (EntityId, &'a Planet)>) -> Self {
        let colliders = planets
            .into_iter()
            .filter(|(_, p)| p.active && !p.is_dead())
            .map(|(id, p)| Collider {
                id,
                center: p.center,
                radius: p.radius(),
                tag: p.tag,
            })
            .collect();
        Self { colliders }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl SpatialQuery for SphereScan {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: TagMask) -> Vec<EntityId> {
        self.colliders
            .iter()
            .filter(|c| c.tag.intersects(mask))
            .filter(|c| c.center.distance(center) <= radius + c.radius)
            .map(|c| c.id)
            .collect()
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: TagMask) -> bool {
        let Some(dir) = crate::normalize_or_none(direction) else {
            return false;
        };

        self.colliders
            .iter()
            .filter(|c| c.tag.intersects(mask))
            .any(|c| ray_sphere_distance(origin, dir, c.center, c.radius)
                .is_some_and(|t| t <= max_distance))
    }
}

/// Distance along a unit ray to a sphere's surface, `None` on a miss or
/// when the origin is inside the sphere
pub fn ray_sphere_distance(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = oc.dot(dir);
    if b > 0.0 {
        // Pointing away from the sphere
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

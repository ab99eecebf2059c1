//! Combatants: a planet plus score and the swallow protocol
//!
//! Dominance is decided by score alone. A planet's score is its radius until
//! it first swallows something; from then on it is the running total of
//! everything it has absorbed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::planet::{EntityId, Planet, TagMask};
use super::rewind::{BadgeMemento, BodyKey, BodyKind, Memento, PlayerMemento, TimeBody, Timeline};
use super::spatial::SpatialQuery;
use crate::consts::*;
use crate::{normalize_or_none, project_on_plane};

/// What produces a combatant's movement each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    /// Built-in steering policy
    Ai { can_attack: bool },
    /// Keyboard/touch input from the tick input
    Human,
    /// Actions supplied by an external learner
    External,
    /// Never moves (the black hole)
    Inert,
}

/// Score and movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Accumulated score; 0 until the first swallow
    pub score: f32,
    pub move_speed: f32,
}

/// Name badge shown over the planet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub alpha: f32,
}

/// Nearest rival as seen this tick (never kept across ticks)
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePlayerInfo {
    pub rival: EntityId,
    pub planet: Planet,
    pub score: f32,
    /// The black hole blocks the line between the two planets
    pub occluded_by_black_hole: bool,
}

/// A competing planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub planet: Planet,
    pub stats: PlayerStats,
    pub badge: Badge,
    pub driver: Driver,
}

impl Combatant {
    pub fn new(id: EntityId, name: impl Into<String>, planet: Planet, driver: Driver) -> Self {
        Self {
            id,
            name: name.into(),
            planet,
            stats: PlayerStats {
                score: 0.0,
                move_speed: MOVE_SPEED,
            },
            badge: Badge { alpha: 1.0 },
            driver,
        }
    }

    /// Stored score, or the current radius before any swallow
    pub fn score(&self) -> f32 {
        if self.stats.score == 0.0 {
            self.planet.radius()
        } else {
            self.stats.score
        }
    }

    pub fn is_black_hole(&self) -> bool {
        self.planet.is_black_hole()
    }

    pub fn is_alive(&self) -> bool {
        !self.planet.is_dead()
    }

    /// Find the closest live rival on this planet's rival channels.
    ///
    /// Rescans everything within twice the arena radius. `roster` must be
    /// sorted by id.
    pub fn closest_rival(
        &self,
        roster: &[Combatant],
        provider: &dyn SpatialQuery,
        arena_radius: f32,
    ) -> Option<ClosePlayerInfo> {
        let center = self.planet.center;
        let rival = provider
            .overlap_sphere(center, arena_radius * 2.0, self.planet.rival_tags)
            .into_iter()
            .filter_map(|id| find(roster, id))
            .filter(|c| c.id != self.id && c.planet.active && c.is_alive())
            .min_by(|a, b| {
                let da = a.planet.center.distance_squared(center);
                let db = b.planet.center.distance_squared(center);
                da.total_cmp(&db).then(a.id.cmp(&b.id))
            })?;

        Some(ClosePlayerInfo {
            rival: rival.id,
            planet: rival.planet.clone(),
            score: rival.score(),
            occluded_by_black_hole: is_occluded_by_black_hole(&rival.planet, &self.planet, provider),
        })
    }

    /// Strictly higher score against a rival that is not the black hole
    pub fn can_swallow(&self, info: Option<&ClosePlayerInfo>) -> bool {
        info.is_some_and(|info| !info.planet.is_black_hole() && self.score() > info.score)
    }

    /// `can_swallow`, and the rival's center is at least half its radius
    /// inside this planet
    pub fn should_swallow(&self, info: Option<&ClosePlayerInfo>) -> bool {
        let Some(rival) = info else {
            return false;
        };
        self.can_swallow(info)
            && self.planet.distance_to(&rival.planet)
                <= rival.planet.radius() * -SWALLOW_DEPTH_FACTOR
    }

    /// Swallow `rival` if the dominance and depth rules allow it
    pub fn try_swallow(
        &mut self,
        rival: &mut Combatant,
        info: &ClosePlayerInfo,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if info.rival != rival.id || !self.should_swallow(Some(info)) {
            return false;
        }
        self.swallow(rival, events);
        true
    }

    /// Absorb `rival`: grow, blend color, take its score, kill it
    pub fn swallow(&mut self, rival: &mut Combatant, events: &mut Vec<GameEvent>) {
        if !self.is_black_hole() {
            let own = self.planet.radius();
            let theirs = rival.planet.radius();
            let total = own + theirs;
            let t = if total > 0.0 { theirs / total } else { 0.0 };
            self.planet.color = self.planet.color.lerp(rival.planet.color, t);
            self.planet.set_target_radius(self.planet.target_radius() + theirs);
        }

        self.stats.score = self.score() + rival.score();

        events.push(GameEvent::SwallowedOther {
            by: self.id,
            victim: rival.id,
        });
        rival.was_swallowed();
        events.push(GameEvent::WasSwallowed {
            victim: rival.id,
            by: self.id,
        });
    }

    fn was_swallowed(&mut self) {
        self.planet.die();
        self.badge.alpha = DEFEATED_BADGE_ALPHA;
    }

    /// Steer along `direction`.
    ///
    /// Adds a velocity change along `direction` (its length is the
    /// strength) scaled down by mass, then drops any sideways velocity so
    /// the planet heads where it is pushed.
    pub fn apply_move(&mut self, direction: Vec3) {
        if self.planet.is_dead() || self.planet.kinematic {
            return;
        }
        let Some(heading) = normalize_or_none(direction) else {
            return;
        };

        let speed = self.stats.move_speed / (self.planet.mass() * MOVE_MASS_FACTOR);
        let velocity = self.planet.velocity + direction * speed;
        self.planet.velocity = velocity - project_on_plane(velocity, heading);
    }

    /// Bring the planet back at `position` with a fresh radius; score is kept
    pub fn respawn(&mut self, position: Vec3, radius: f32) {
        self.planet.active = true;
        self.planet.revive();
        self.planet.set_radius(radius);
        self.planet.center = position;
        self.planet.velocity = Vec3::ZERO;
        self.badge.alpha = 1.0;
    }
}

impl TimeBody for PlayerStats {
    fn capture(&self) -> Memento {
        Memento::Player(PlayerMemento {
            score: self.score,
            move_speed: self.move_speed,
        })
    }

    fn restore(&mut self, memento: &Memento) {
        if let Memento::Player(m) = memento {
            self.score = m.score;
            self.move_speed = m.move_speed;
        }
    }
}

impl TimeBody for Badge {
    fn capture(&self) -> Memento {
        Memento::Badge(BadgeMemento { alpha: self.alpha })
    }

    fn restore(&mut self, memento: &Memento) {
        if let Memento::Badge(m) = memento {
            self.alpha = m.alpha;
        }
    }
}

impl Timeline for [Combatant] {
    fn visit_bodies(&self, visit: &mut dyn FnMut(BodyKey, &dyn TimeBody)) {
        for c in self {
            visit(BodyKey::new(c.id, BodyKind::Planet), &c.planet);
            visit(BodyKey::new(c.id, BodyKind::Player), &c.stats);
            visit(BodyKey::new(c.id, BodyKind::Badge), &c.badge);
        }
    }

    fn visit_bodies_mut(&mut self, visit: &mut dyn FnMut(BodyKey, &mut dyn TimeBody)) {
        for c in self {
            visit(BodyKey::new(c.id, BodyKind::Planet), &mut c.planet);
            visit(BodyKey::new(c.id, BodyKind::Player), &mut c.stats);
            visit(BodyKey::new(c.id, BodyKind::Badge), &mut c.badge);
        }
    }
}

/// Whether the black hole blocks the view from `from` to `to`.
///
/// The ray stops at the near surface of `to`.
pub fn is_occluded_by_black_hole(from: &Planet, to: &Planet, provider: &dyn SpatialQuery) -> bool {
    let length = from.distance_to(to) + from.radius();
    provider.raycast(from.center, to.center - from.center, length, TagMask::BLACK_HOLE)
}

/// Look up a combatant in an id-sorted roster
pub fn find(roster: &[Combatant], id: EntityId) -> Option<&Combatant> {
    roster
        .binary_search_by_key(&id, |c| c.id)
        .ok()
        .and_then(|i| roster.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::planet::Color;
    use crate::sim::spatial::SphereScan;
    use proptest::prelude::*;

    fn combatant(id: u32, center: Vec3, radius: f32) -> Combatant {
        let planet = Planet::new(center, radius, 100.0);
        Combatant::new(EntityId(id), format!("p{id}"), planet, Driver::Ai { can_attack: true })
    }

    fn info_for(c: &Combatant) -> ClosePlayerInfo {
        ClosePlayerInfo {
            rival: c.id,
            planet: c.planet.clone(),
            score: c.score(),
            occluded_by_black_hole: false,
        }
    }

    fn scan(roster: &[Combatant]) -> SphereScan {
        SphereScan::from_planets(roster.iter().map(|c| (c.id, &c.planet)))
    }

    #[test]
    fn test_score_defaults_to_radius() {
        let c = combatant(0, Vec3::ZERO, 4.0);
        assert_eq!(c.score(), 4.0);
    }

    #[test]
    fn test_swallow_scenario() {
        // A (r=5) and B (r=3) overlap by 1.5, exactly half of B's radius
        let mut a = combatant(0, Vec3::ZERO, 5.0);
        let mut b = combatant(1, Vec3::new(6.5, 0.0, 0.0), 3.0);
        assert_eq!(a.planet.distance_to(&b.planet), -1.5);

        let info = info_for(&b);
        assert!(a.can_swallow(Some(&info)));
        assert!(!b.can_swallow(Some(&info_for(&a))));

        let mut events = Vec::new();
        assert!(a.try_swallow(&mut b, &info, &mut events));
        assert_eq!(a.planet.target_radius(), 8.0);
        assert_eq!(a.score(), 8.0);
        assert!(!b.is_alive());
        assert_eq!(b.badge.alpha, DEFEATED_BADGE_ALPHA);
        assert_eq!(
            events,
            vec![
                GameEvent::SwallowedOther { by: EntityId(0), victim: EntityId(1) },
                GameEvent::WasSwallowed { victim: EntityId(1), by: EntityId(0) },
            ]
        );
    }

    #[test]
    fn test_contact_is_not_enough() {
        let mut a = combatant(0, Vec3::ZERO, 5.0);
        // Gap -1.0 is shallower than -1.5
        let mut b = combatant(1, Vec3::new(7.0, 0.0, 0.0), 3.0);
        let info = info_for(&b);
        let mut events = Vec::new();
        assert!(a.can_swallow(Some(&info)));
        assert!(!a.try_swallow(&mut b, &info, &mut events));
        assert!(events.is_empty());
        assert!(b.is_alive());
    }

    #[test]
    fn test_ties_never_swallow() {
        let a = combatant(0, Vec3::ZERO, 5.0);
        let b = combatant(1, Vec3::new(1.0, 0.0, 0.0), 5.0);
        assert!(!a.can_swallow(Some(&info_for(&b))));
        assert!(!b.can_swallow(Some(&info_for(&a))));
    }

    #[test]
    fn test_no_rival_no_swallow() {
        let a = combatant(0, Vec3::ZERO, 5.0);
        assert!(!a.can_swallow(None));
        assert!(!a.should_swallow(None));
    }

    #[test]
    fn test_black_hole_cannot_be_swallowed() {
        let a = combatant(0, Vec3::ZERO, 80.0);
        let hole = Combatant::new(EntityId(1), "hole", Planet::black_hole(Vec3::ZERO, 50.0), Driver::Inert);
        assert!(!a.can_swallow(Some(&info_for(&hole))));
    }

    #[test]
    fn test_black_hole_swallow_keeps_size_and_color() {
        let mut hole = Combatant::new(EntityId(0), "hole", Planet::black_hole(Vec3::ZERO, 50.0), Driver::Inert);
        hole.planet.set_target_radius(200.0);
        let mut b = combatant(1, Vec3::new(40.0, 0.0, 0.0), 3.0);
        let mut events = Vec::new();
        hole.swallow(&mut b, &mut events);

        assert_eq!(hole.planet.target_radius(), 200.0);
        assert_eq!(hole.planet.color, Color::BLACK);
        assert_eq!(hole.score(), 53.0);
        assert!(!b.is_alive());
    }

    #[test]
    fn test_color_blend_weighted_by_radius() {
        let mut a = combatant(0, Vec3::ZERO, 3.0);
        a.planet.color = Color::rgb(0.0, 0.0, 0.0);
        let mut b = combatant(1, Vec3::ZERO, 1.0);
        b.planet.color = Color::rgb(1.0, 1.0, 1.0);
        a.swallow(&mut b, &mut Vec::new());
        assert!((a.planet.color.r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_closest_rival_skips_self_and_dead() {
        let mut roster = vec![
            combatant(0, Vec3::ZERO, 2.0),
            combatant(1, Vec3::new(5.0, 0.0, 0.0), 1.0),
            combatant(2, Vec3::new(20.0, 0.0, 0.0), 1.0),
        ];
        roster[1].planet.die();

        let provider = scan(&roster);
        let info = roster[0].closest_rival(&roster, &provider, 100.0).unwrap();
        assert_eq!(info.rival, EntityId(2));
        assert!(!info.occluded_by_black_hole);

        roster[2].planet.active = false;
        let provider = scan(&roster);
        assert!(roster[0].closest_rival(&roster, &provider, 100.0).is_none());
    }

    #[test]
    fn test_closest_rival_reports_occlusion() {
        let mut hole = Planet::black_hole(Vec3::ZERO, 10.0);
        hole.active = true;
        let roster = vec![
            Combatant::new(EntityId(0), "hole", hole, Driver::Inert),
            combatant(1, Vec3::new(30.0, 0.0, 0.0), 2.0),
            combatant(2, Vec3::new(-30.0, 0.0, 0.0), 2.0),
        ];
        let provider = scan(&roster);
        let info = roster[1].closest_rival(&roster, &provider, 100.0).unwrap();
        assert_eq!(info.rival, EntityId(2));
        assert!(info.occluded_by_black_hole);
    }

    #[test]
    fn test_move_cancels_sideways_velocity() {
        let mut c = combatant(0, Vec3::ZERO, 5.0);
        c.planet.velocity = Vec3::new(0.0, 4.0, 0.0);
        c.apply_move(Vec3::X);

        let expected = MOVE_SPEED / (0.5 * MOVE_MASS_FACTOR);
        assert!((c.planet.velocity.x - expected).abs() < 1e-4);
        assert!(c.planet.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn test_move_ignored_when_frozen_or_zero() {
        let mut c = combatant(0, Vec3::ZERO, 5.0);
        c.planet.velocity = Vec3::Y;
        c.apply_move(Vec3::ZERO);
        assert_eq!(c.planet.velocity, Vec3::Y);

        c.planet.kinematic = true;
        c.apply_move(Vec3::X);
        assert_eq!(c.planet.velocity, Vec3::Y);
    }

    #[test]
    fn test_respawn_keeps_score() {
        let mut a = combatant(0, Vec3::ZERO, 5.0);
        let mut b = combatant(1, Vec3::ZERO, 3.0);
        b.stats.score = 12.0;
        b.planet.velocity = Vec3::X;
        a.stats.score = 20.0;
        a.swallow(&mut b, &mut Vec::new());
        assert!(!b.is_alive());

        b.respawn(Vec3::new(1.0, 2.0, 3.0), 4.0);
        assert!(b.is_alive());
        assert_eq!(b.planet.radius(), 4.0);
        assert_eq!(b.planet.target_radius(), 4.0);
        assert_eq!(b.planet.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.planet.velocity, Vec3::ZERO);
        assert_eq!(b.score(), 12.0);
    }

    #[test]
    fn test_rewind_undoes_swallow() {
        use crate::sim::rewind::RewindEngine;

        let mut roster = vec![
            combatant(0, Vec3::ZERO, 5.0),
            combatant(1, Vec3::new(6.5, 0.0, 0.0), 3.0),
        ];
        let mut engine = RewindEngine::new(8);
        engine.record(&roster[..]);

        let (a, b) = roster.split_at_mut(1);
        a[0].swallow(&mut b[0], &mut Vec::new());
        assert!(!roster[1].is_alive());

        assert!(engine.step_back(&mut roster[..]));
        assert!(roster[1].is_alive());
        assert_eq!(roster[1].badge.alpha, 1.0);
        assert_eq!(roster[0].score(), 5.0);
        assert_eq!(roster[0].planet.target_radius(), 5.0);
    }

    proptest! {
        #[test]
        fn prop_swallow_conserves_score(
            ra in 0.5f32..50.0,
            rb in 0.5f32..50.0,
            sa in prop_oneof![Just(0.0f32), 1.0f32..500.0],
            sb in prop_oneof![Just(0.0f32), 1.0f32..500.0],
        ) {
            let mut a = combatant(0, Vec3::ZERO, ra);
            let mut b = combatant(1, Vec3::ZERO, rb);
            a.stats.score = sa;
            b.stats.score = sb;
            let expected = a.score() + b.score();
            a.swallow(&mut b, &mut Vec::new());
            prop_assert_eq!(a.score(), expected);
        }

        #[test]
        fn prop_equal_scores_never_swallow(r in 0.5f32..50.0, d in 0.0f32..10.0) {
            let a = combatant(0, Vec3::ZERO, r);
            let b = combatant(1, Vec3::new(d, 0.0, 0.0), r);
            prop_assert!(!a.can_swallow(Some(&info_for(&b))));
            prop_assert!(!b.can_swallow(Some(&info_for(&a))));
        }
    }
}

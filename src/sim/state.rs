//! World state and the simulation clock
//!
//! Everything a tick reads or writes lives in [`World`]. Combatants are kept
//! sorted by id so every pass over them runs in the same order.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::black_hole::BlackHole;
use super::combatant::{ClosePlayerInfo, Combatant, Driver};
use super::events::{EventBus, EventObserver, GameEvent};
use super::planet::{Color, EntityId, Planet, TagMask};
use super::rewind::{BodyKey, RewindEngine, TimeBody, Timeline};
use super::spatial::SphereScan;
use crate::GameConfig;

/// Running flag, tick counter and timestep, passed explicitly to updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    pub running: bool,
    pub tick: u64,
    pub dt: f32,
}

impl SimulationClock {
    pub fn new(dt: f32) -> Self {
        Self {
            running: true,
            tick: 0,
            dt,
        }
    }
}

/// The whole simulation
#[derive(Debug)]
pub struct World {
    pub config: GameConfig,
    pub arena: Arena,
    pub clock: SimulationClock,
    /// Every combatant, black hole included, sorted by id
    pub combatants: Vec<Combatant>,
    pub black_hole: Option<BlackHole>,
    pub rewind: RewindEngine,
    pub rng: Pcg32,
    next_id: u32,
    /// Events raised since the last publish
    pending: Vec<GameEvent>,
    bus: EventBus,
}

impl World {
    /// A world with the black hole at the arena center, reset for a round
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut world = Self::without_black_hole(config, seed);

        let id = world.next_entity_id();
        let mut planet = BlackHole::spawn_planet(world.arena.center);
        planet.growth_rate = world.config.growth_rate;
        world.arena.reset(&mut planet, world.config.max_planet_radius);
        let mut hole = Combatant::new(id, "Black Hole", planet, Driver::Inert);
        hole.stats.move_speed = 0.0;
        world.combatants.push(hole);
        world.black_hole = Some(BlackHole::new(id));

        world
    }

    /// A world with no black hole at all
    pub fn without_black_hole(config: GameConfig, seed: u64) -> Self {
        let arena = Arena::new(Vec3::ZERO, config.arena_radius());
        let clock = SimulationClock::new(config.fixed_dt);
        let rewind = RewindEngine::for_duration(config.record_seconds, config.fixed_dt);
        log::info!(
            "World created: arena radius {}, seed {}, {} rewind snapshots",
            arena.radius,
            seed,
            rewind.capacity()
        );

        Self {
            config,
            arena,
            clock,
            combatants: Vec::new(),
            black_hole: None,
            rewind,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
            pending: Vec::new(),
            bus: EventBus::new(),
        }
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        super::combatant::find(&self.combatants, id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        let index = self.combatants.binary_search_by_key(&id, |c| c.id).ok()?;
        self.combatants.get_mut(index)
    }

    pub fn black_hole_planet(&self) -> Option<&Planet> {
        let hole = self.black_hole?;
        self.get(hole.id()).map(|c| &c.planet)
    }

    /// Add a fully built combatant
    pub fn spawn(&mut self, name: impl Into<String>, planet: Planet, driver: Driver) -> EntityId {
        let id = self.next_entity_id();
        let mut combatant = Combatant::new(id, name, planet, driver);
        combatant.stats.move_speed = self.config.move_speed;
        // Ids only grow, so pushing keeps the roster sorted
        self.combatants.push(combatant);
        id
    }

    /// Spawn a roster player at a random free spot
    pub fn spawn_planet(&mut self, name: impl Into<String>, radius: f32, driver: Driver) -> EntityId {
        self.spawn_at_random(name, radius, driver, TagMask::PLAYER, TagMask::PLANETS)
    }

    /// Spawn subscriber planets sized by comment count, capped by the config
    pub fn spawn_subscribers(&mut self, subscribers: &[(String, u32)]) -> Vec<EntityId> {
        let cap = self.config.number_of_subs_players;
        let ids: Vec<EntityId> = subscribers
            .iter()
            .take(cap)
            .map(|(name, comments)| {
                self.spawn_at_random(
                    name.clone(),
                    Self::radius_for_comment_count(*comments),
                    Driver::Ai { can_attack: true },
                    TagMask::MY_SUBS,
                    TagMask::PLANETS.union(TagMask::MY_SUBS),
                )
            })
            .collect();
        log::info!("Spawned {} of {} subscribers", ids.len(), subscribers.len());
        ids
    }

    /// Subscriber planet radius: one unit per five comments, between 1 and 5
    pub fn radius_for_comment_count(comments: u32) -> f32 {
        (comments as f32 / 5.0).clamp(1.0, 5.0)
    }

    fn spawn_at_random(
        &mut self,
        name: impl Into<String>,
        radius: f32,
        driver: Driver,
        tag: TagMask,
        rival_tags: TagMask,
    ) -> EntityId {
        let radius = radius.clamp(0.0, self.config.max_planet_radius);
        let center = self.random_point_for(radius);
        let mut planet = Planet::new(center, radius, self.config.max_planet_radius);
        planet.growth_rate = self.config.growth_rate;
        planet.color = Color::rgb(self.rng.random(), self.rng.random(), self.rng.random());
        planet.tag = tag;
        planet.rival_tags = rival_tags;
        self.spawn(name, planet, driver)
    }

    fn random_point_for(&mut self, radius: f32) -> Vec3 {
        let hole = self
            .black_hole
            .and_then(|h| super::combatant::find(&self.combatants, h.id()))
            .map(|c| &c.planet);
        self.arena.valid_random_point_for(radius, hole, &mut self.rng)
    }

    /// Collider view of the current planets
    pub fn spatial(&self) -> SphereScan {
        SphereScan::from_planets(self.combatants.iter().map(|c| (c.id, &c.planet)))
    }

    /// Closest rival of `id` right now
    pub fn closest_rival(&self, id: EntityId) -> Option<ClosePlayerInfo> {
        let me = self.get(id)?;
        me.closest_rival(&self.combatants, &self.spatial(), self.arena.radius)
    }

    /// Surface gap from `id` to the black hole, `f32::MAX` without one
    pub fn distance_to_black_hole(&self, id: EntityId) -> f32 {
        match self.get(id) {
            Some(c) => self.arena.distance_to_black_hole(&c.planet, self.black_hole_planet()),
            None => f32::MAX,
        }
    }

    /// Revive `id` at `position` with a fresh radius; the black hole can't
    /// be respawned
    pub fn respawn(&mut self, id: EntityId, position: Vec3, radius: f32) -> bool {
        let Some(combatant) = self.get_mut(id).filter(|c| !c.is_black_hole()) else {
            return false;
        };
        combatant.respawn(position, radius);
        self.pending.push(GameEvent::Respawned { id });
        true
    }

    /// Respawn at a random free spot with a random radius in [1, 10)
    pub fn respawn_random(&mut self, id: EntityId) -> bool {
        let radius = self.rng.random_range(1.0..10.0);
        let position = self.random_point_for(radius);
        self.respawn(id, position, radius)
    }

    /// Start a new round: shrink the black hole back to its seed and bring
    /// every dead planet back. Scores are kept.
    pub fn reset_round(&mut self) {
        if let Some(hole) = self.black_hole {
            let arena = self.arena;
            let max = self.config.max_planet_radius;
            if let Some(c) = self.get_mut(hole.id()) {
                arena.reset(&mut c.planet, max);
            }
            self.black_hole = Some(BlackHole::new(hole.id()));
        }
        self.pending.push(GameEvent::RoundReset);

        let dead: Vec<EntityId> = self
            .combatants
            .iter()
            .filter(|c| !c.is_alive() && !c.is_black_hole())
            .map(|c| c.id)
            .collect();
        for id in dead {
            self.respawn_random(id);
        }
        log::info!("Round reset at tick {}", self.clock.tick);
    }

    /// Let the weakest live roster player absorb subscriber planets.
    ///
    /// The channel is only ever added, never taken away.
    pub fn ensure_smallest_can_absorb_subs(&mut self) -> Option<EntityId> {
        let mut smallest: Option<(EntityId, f32)> = None;
        for c in &self.combatants {
            if !c.is_alive() || c.is_black_hole() || c.planet.tag != TagMask::PLAYER {
                continue;
            }
            let score = c.score();
            if smallest.is_none_or(|(_, s)| score < s) {
                smallest = Some((c.id, score));
            }
        }

        let (id, _) = smallest?;
        let combatant = self.get_mut(id)?;
        combatant.planet.rival_tags = combatant.planet.rival_tags.union(TagMask::MY_SUBS);
        Some(id)
    }

    /// Freeze bodies and pause; false if already rewinding
    pub fn begin_rewind(&mut self) -> bool {
        if !self.rewind.begin(self.combatants.as_mut_slice()) {
            return false;
        }
        self.clock.running = false;
        self.pending.push(GameEvent::RewindStarted);
        true
    }

    /// Unfreeze bodies. The clock stays paused until toggled back on.
    pub fn end_rewind(&mut self) -> bool {
        if !self.rewind.end(self.combatants.as_mut_slice()) {
            return false;
        }
        self.pending.push(GameEvent::RewindStopped);
        true
    }

    /// Record the current state into the rewind history
    pub fn record(&mut self) {
        self.rewind.record(self.combatants.as_slice());
    }

    /// Restore the newest recorded state
    pub fn step_back(&mut self) -> bool {
        self.rewind.step_back(self.combatants.as_mut_slice())
    }

    pub fn subscribe(&mut self, observer: impl EventObserver + 'static) {
        self.bus.subscribe(observer);
    }

    pub(crate) fn push_events(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.pending.extend(events);
    }

    /// Deliver everything raised since the last publish to the observers
    pub fn publish_pending(&mut self) -> Vec<GameEvent> {
        let events = std::mem::take(&mut self.pending);
        self.bus.publish(&events);
        events
    }
}

impl Timeline for World {
    fn visit_bodies(&self, visit: &mut dyn FnMut(BodyKey, &dyn TimeBody)) {
        self.combatants.as_slice().visit_bodies(visit);
    }

    fn visit_bodies_mut(&mut self, visit: &mut dyn FnMut(BodyKey, &mut dyn TimeBody)) {
        self.combatants.as_mut_slice().visit_bodies_mut(visit);
    }
}

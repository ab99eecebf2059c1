//! Fixed timestep simulation tick
//!
//! One call advances the world by `clock.dt` in a fixed order: commands,
//! rewind, recording, growth, black hole, swallowing, movement,
//! containment, then integration. Events raised along the way reach the
//! observers before the call returns.
//!
//! The snapshot is taken before the tick changes anything, so rewinding N
//! steps after N running ticks lands exactly on the state the first of
//! those ticks started from.

use glam::Vec3;

use super::ai::AiPolicy;
use super::combatant::{Combatant, Driver};
use super::events::GameEvent;
use super::planet::EntityId;
use super::state::World;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start rewinding (pauses the simulation)
    pub begin_rewind: bool,
    /// Stop rewinding; the simulation stays paused
    pub end_rewind: bool,
    /// Pause toggle
    pub toggle_running: bool,
    /// Movement axes for human planets
    pub human_move: Option<Vec3>,
    /// Actions for externally driven planets
    pub agent_actions: Vec<(EntityId, [f32; 3])>,
}

/// Advance the world by one fixed timestep and return the tick's events
pub fn tick(world: &mut World, input: &TickInput) -> Vec<GameEvent> {
    if input.toggle_running {
        world.clock.running = !world.clock.running;
    }
    if input.begin_rewind {
        world.begin_rewind();
    }
    if input.end_rewind {
        world.end_rewind();
    }

    if world.rewind.is_rewinding() {
        world.step_back();
        return world.publish_pending();
    }
    if !world.clock.running {
        return world.publish_pending();
    }

    world.record();

    let clock = world.clock;
    let dt = clock.dt;
    for c in world
        .combatants
        .iter_mut()
        .filter(|c| c.planet.can_update(&clock))
    {
        c.planet.advance(dt);
    }

    update_black_hole(world);
    resolve_swallows(world);
    apply_drivers(world, input);
    contain(world);
    integrate(world, dt);
    world.ensure_smallest_can_absorb_subs();

    world.clock.tick += 1;
    world.publish_pending()
}

fn update_black_hole(world: &mut World) {
    let Some(mut hole) = world.black_hole else {
        return;
    };
    let collapsed = world
        .get(hole.id())
        .is_some_and(|c| hole.update(&c.planet, &world.clock));
    world.black_hole = Some(hole);

    if collapsed {
        world.push_events([GameEvent::ArenaCollapsed]);
        if world.config.reset_on_collapse {
            world.reset_round();
        }
    }
}

/// Every live combatant, in id order, tries to swallow its closest rival
fn resolve_swallows(world: &mut World) {
    let ids: Vec<EntityId> = world.combatants.iter().map(|c| c.id).collect();
    let mut events = Vec::new();

    for id in ids {
        // Swallowed earlier this tick
        if !world.get(id).is_some_and(|c| c.is_alive()) {
            continue;
        }
        let Some(info) = world.closest_rival(id) else {
            continue;
        };
        if let Some((me, rival)) = pair_mut(&mut world.combatants, id, info.rival) {
            me.try_swallow(rival, &info, &mut events);
        }
    }

    world.push_events(events);
}

fn apply_drivers(world: &mut World, input: &TickInput) {
    let arena = world.arena;
    let hole = world.black_hole_planet().cloned();

    for i in 0..world.combatants.len() {
        let c = &world.combatants[i];
        if !c.is_alive() {
            continue;
        }

        let direction = match c.driver {
            Driver::Inert => None,
            Driver::Human => input.human_move,
            Driver::External => input
                .agent_actions
                .iter()
                .find(|(id, _)| *id == c.id)
                .map(|(_, action)| Vec3::from_array(*action) * AGENT_ACTION_SCALE),
            Driver::Ai { can_attack } => {
                let rival = world.closest_rival(c.id);
                AiPolicy::new(can_attack).decide(c, &arena, hole.as_ref(), rival.as_ref(), &mut world.rng)
            }
        };

        if let Some(direction) = direction {
            world.combatants[i].apply_move(direction);
        }
    }
}

/// Bounce planets off the arena wall and steer them back inside
fn contain(world: &mut World) {
    let arena = world.arena;
    for c in world
        .combatants
        .iter_mut()
        .filter(|c| c.is_alive() && !c.is_black_hole())
    {
        if let Some(contact) = arena.enforce_containment(&c.planet) {
            c.planet.velocity = contact.velocity;
            c.apply_move(contact.inward);
        }
    }
}

/// Reference rigid-body step: linear drag then position update
fn integrate(world: &mut World, dt: f32) {
    let drag = world.config.linear_drag;
    for c in world
        .combatants
        .iter_mut()
        .filter(|c| c.is_alive() && !c.planet.kinematic)
    {
        // Human planets glide without drag
        let drag = if c.driver == Driver::Human { 0.0 } else { drag };
        c.planet.velocity *= (1.0 - drag * dt).max(0.0);
        c.planet.center += c.planet.velocity * dt;
    }
}

/// Two distinct combatants from an id-sorted roster
fn pair_mut(
    roster: &mut [Combatant],
    a: EntityId,
    b: EntityId,
) -> Option<(&mut Combatant, &mut Combatant)> {
    let ia = roster.binary_search_by_key(&a, |c| c.id).ok()?;
    let ib = roster.binary_search_by_key(&b, |c| c.id).ok()?;
    if ia < ib {
        let (lo, hi) = roster.split_at_mut(ib);
        Some((lo.get_mut(ia)?, hi.first_mut()?))
    } else if ib < ia {
        let (lo, hi) = roster.split_at_mut(ia);
        Some((hi.first_mut()?, lo.get_mut(ib)?))
    } else {
        None
    }
}

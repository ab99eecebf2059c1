//! Event Horizon entry point
//!
//! Headless runner: builds a world from an optional JSON config, fills it
//! with bots and subscriber planets, and runs the fixed timestep loop.
//!
//! Usage: `event-horizon [CONFIG.json] [--seconds N] [--rewind N] [-v]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use event_horizon::sim::{Driver, GameEvent, LogObserver, TickInput, World, tick};
use event_horizon::{GameConfig, logging};

const BOT_COUNT: usize = 4;

/// Headless planet-swallowing simulation around a growing black hole
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; defaults are used when omitted
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Rewind this many seconds once the run ends
    #[arg(long)]
    rewind: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("Event Horizon (headless) starting...");

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let seed = config.seed;
    let mut world = World::new(config, seed);
    world.subscribe(LogObserver);
    populate(&mut world);

    let ticks = (args.seconds / world.clock.dt).round() as u64;
    let mut swallows = 0usize;
    let mut collapses = 0usize;
    for _ in 0..ticks {
        for event in tick(&mut world, &TickInput::default()) {
            match event {
                GameEvent::SwallowedOther { .. } => swallows += 1,
                GameEvent::ArenaCollapsed => collapses += 1,
                _ => {}
            }
        }
    }
    log::info!(
        "Ran {} ticks: {} swallows, {} collapses",
        world.clock.tick,
        swallows,
        collapses
    );

    if let Some(rewind) = args.rewind {
        let steps = (rewind / world.clock.dt).round() as usize;
        let begin = TickInput {
            begin_rewind: true,
            ..Default::default()
        };
        tick(&mut world, &begin);
        for _ in 1..steps {
            tick(&mut world, &TickInput::default());
        }
        let end = TickInput {
            end_rewind: true,
            ..Default::default()
        };
        tick(&mut world, &end);
        log::info!("Rewound {} seconds, {} snapshots left", rewind, world.rewind.len());
    }

    report(&world);
    ExitCode::SUCCESS
}

fn populate(world: &mut World) {
    world.spawn_planet("Player", 5.0, Driver::Human);
    for i in 0..BOT_COUNT {
        let can_attack = i % 2 == 0;
        world.spawn_planet(format!("Bot {i}"), 3.0 + i as f32, Driver::Ai { can_attack });
    }

    let subscribers: Vec<(String, u32)> = (0..world.config.number_of_subs_players)
        .map(|i| (format!("Subscriber {i}"), (i as u32 + 1) * 3))
        .collect();
    world.spawn_subscribers(&subscribers);
}

fn report(world: &World) {
    let mut standings: Vec<_> = world
        .combatants
        .iter()
        .filter(|c| !c.is_black_hole())
        .collect();
    standings.sort_by(|a, b| b.score().total_cmp(&a.score()).then(a.id.cmp(&b.id)));

    for c in standings {
        log::info!(
            "{:>16}  score {:>8.2}  radius {:>6.2}  {}",
            c.name,
            c.score(),
            c.planet.radius(),
            if c.is_alive() { "alive" } else { "swallowed" }
        );
    }
}

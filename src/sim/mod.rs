//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod arena;
pub mod black_hole;
pub mod combatant;
pub mod events;
pub mod frame;
pub mod learning;
pub mod planet;
pub mod rewind;
pub mod spatial;
pub mod state;
pub mod tick;

pub use ai::AiPolicy;
pub use arena::{Arena, WallContact};
pub use black_hole::BlackHole;
pub use combatant::{ClosePlayerInfo, Combatant, Driver};
pub use events::{EventBus, EventObserver, GameEvent, LogObserver};
pub use frame::{RenderSphere, ShaderParams};
pub use learning::{LearningState, Observation, StateDelta};
pub use planet::{Color, EntityId, Planet, TagMask};
pub use rewind::{Memento, RewindEngine, Snapshot, TimeBody, Timeline};
pub use spatial::{SpatialQuery, SphereScan};
pub use state::{SimulationClock, World};
pub use tick::{TickInput, tick};

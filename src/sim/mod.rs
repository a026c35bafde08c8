//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, injected through `UniformSource`
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod combat;
pub mod event;
pub mod random;
pub mod simulator;
pub mod state;
pub mod tick;

pub use arena::{Arena, Enemy, Hud, Player, PowerUp};
pub use combat::{
    CombatOutcome, EnemyKind, EnemySpec, Encounter, PlayerState, collect_power_up,
    evaluate_combat, on_enemy_spawn_tick, resolve_encounter, sample_enemy_power,
};
pub use event::{Command, EntityId, GameEvent};
pub use random::{FixedDraws, UniformSource, gaussian, standard_normal};
pub use simulator::Simulator;
pub use state::{GamePhase, GameState, SessionStats};
pub use tick::{FrameClock, TickInput, tick, toggle_pause};

//! Forest Brawl - power-level combat for a top-down arcade brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (combat, progression, arena, tick)
//! - `settings`: Data-driven game balance
//! - `web`: wasm-bindgen boundary for a browser host engine

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{CombatRules, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Convert a millisecond interval into whole simulation ticks (at least 1)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as u64 * consts::TICKS_PER_SECOND as u64 + 500) / 1000;
    ticks.clamp(1, u32::MAX as u64) as u32
}

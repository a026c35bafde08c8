//! Game session state
//!
//! Everything a running session needs lives here: the seeded RNG, the
//! simulator's player counters, the arena and the spawn timers.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::combat::{CombatOutcome, PlayerState};
use super::event::Command;
use super::simulator::Simulator;
use crate::settings::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
}

/// Running tallies for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub enemies_spawned: u32,
    pub power_ups_spawned: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub power_ups_collected: u32,
    pub peak_power: u32,
}

impl SessionStats {
    /// Tally one command issued by the simulator
    pub fn record_command(&mut self, command: &Command) {
        match command {
            Command::SpawnEnemyWithPower { .. } => self.enemies_spawned += 1,
            Command::SpawnPowerUp => self.power_ups_spawned += 1,
            Command::RemovePowerUp { .. } => self.power_ups_collected += 1,
            Command::UpdatePowerDisplay { power_level } => {
                self.peak_power = self.peak_power.max(*power_level);
            }
            _ => {}
        }
    }

    /// Tally one encounter outcome
    pub fn record_outcome(&mut self, outcome: CombatOutcome) {
        match outcome {
            CombatOutcome::PlayerWins => self.wins += 1,
            CombatOutcome::EnemyWins => self.losses += 1,
            CombatOutcome::Tie => self.ties += 1,
        }
    }
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The only randomness the session uses
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub sim: Simulator,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks since the last enemy spawn event
    pub enemy_timer: u32,
    /// Ticks since the last power-up spawn event
    pub power_up_timer: u32,
    /// Commands issued during the most recent tick
    pub last_commands: Vec<Command>,
    pub stats: SessionStats,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Arena::new(&tuning, &mut rng);
        let sim = Simulator::new(tuning.combat.clone());

        Self {
            seed,
            rng,
            tuning,
            sim,
            arena,
            phase: GamePhase::Playing,
            time_ticks: 0,
            enemy_timer: 0,
            power_up_timer: 0,
            last_commands: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn player(&self) -> PlayerState {
        self.sim.player()
    }

    /// Elapsed simulated time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 * crate::consts::SIM_DT
    }
}

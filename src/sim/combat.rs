//! Combat and progression rules
//!
//! Pure functions over [`PlayerState`]: nothing here touches the arena or keeps
//! hidden state. Power comparisons decide every encounter.

use serde::{Deserialize, Serialize};

use super::random::{UniformSource, gaussian};
use crate::settings::CombatRules;

/// The player's persistent counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub power_level: u32,
    pub score: u64,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Enemy appearance (cosmetic, no effect on combat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Dragon,
    Orc,
    Yeti,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Dragon, EnemyKind::Orc, EnemyKind::Yeti];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Dragon => "dragon",
            EnemyKind::Orc => "orc",
            EnemyKind::Yeti => "yeti",
        }
    }
}

/// A freshly spawned enemy's combat stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Always >= 1
    pub power_level: u32,
    pub kind: EnemyKind,
}

/// Result of comparing two power levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    PlayerWins,
    EnemyWins,
    Tie,
}

/// State after an encounter plus what happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encounter {
    pub state: PlayerState,
    pub outcome: CombatOutcome,
    pub score_delta: u64,
}

/// Sample an enemy power level around the player's
///
/// Rounds to nearest and floors at 1. Consumes exactly two uniform draws.
pub fn sample_enemy_power<R: UniformSource + ?Sized>(
    player_power: u32,
    std_dev: f64,
    rng: &mut R,
) -> u32 {
    let sample = gaussian(player_power as f64, std_dev, rng).round();
    // `as` saturates on overflow
    sample.max(1.0) as u32
}

/// Higher power wins; equal power ties
pub fn evaluate_combat(player_power: u32, enemy_power: u32) -> CombatOutcome {
    use std::cmp::Ordering;
    match player_power.cmp(&enemy_power) {
        Ordering::Greater => CombatOutcome::PlayerWins,
        Ordering::Less => CombatOutcome::EnemyWins,
        Ordering::Equal => CombatOutcome::Tie,
    }
}

/// Resolve a player-enemy contact and apply rewards or penalties
pub fn resolve_encounter(state: PlayerState, enemy_power: u32, rules: &CombatRules) -> Encounter {
    let outcome = evaluate_combat(state.power_level, enemy_power);
    let mut next = state;
    let mut score_delta = 0;

    match outcome {
        CombatOutcome::PlayerWins => {
            score_delta = (enemy_power as u64).saturating_mul(rules.score_per_enemy_power);
            next.score = next.score.saturating_add(score_delta);
            next.power_level = next.power_level.saturating_add(rules.win_power_gain);
        }
        CombatOutcome::EnemyWins => {
            next.power_level = next.power_level.saturating_sub(rules.loss_power_penalty);
        }
        CombatOutcome::Tie => {}
    }

    Encounter {
        state: next,
        outcome,
        score_delta,
    }
}

/// Apply a power-up pickup
pub fn collect_power_up(state: PlayerState, rules: &CombatRules) -> PlayerState {
    PlayerState {
        power_level: state.power_level.saturating_add(rules.power_up_power),
        score: state.score.saturating_add(rules.power_up_score),
    }
}

/// Roll the stats for a new enemy on a spawn tick
///
/// Power is sampled first (two draws), then the kind (one draw).
pub fn on_enemy_spawn_tick<R: UniformSource + ?Sized>(
    current_player_power: u32,
    rules: &CombatRules,
    rng: &mut R,
) -> EnemySpec {
    let power_level = sample_enemy_power(current_player_power, rules.enemy_power_std_dev, rng);
    let kind = EnemyKind::ALL[super::random::pick_index(EnemyKind::ALL.len(), rng)];
    EnemySpec { power_level, kind }
}

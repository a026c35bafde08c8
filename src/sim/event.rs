//! Messages exchanged between the simulator and its host
//!
//! Inbound [`GameEvent`]s come from whatever owns timers and contact detection
//! (the in-crate arena or a browser engine). Outbound [`Command`]s tell that
//! host what to spawn, remove, move and display.

use serde::{Deserialize, Serialize};

use super::combat::EnemyKind;

/// Stable identifier for an arena entity
pub type EntityId = u32;

/// Events consumed by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Periodic enemy spawn timer fired
    EnemySpawnTick,
    /// Periodic power-up spawn timer fired
    PowerUpSpawnTick,
    /// Player touched an enemy
    PlayerEnemyContact { enemy: EntityId, enemy_power: u32 },
    /// Player touched a power-up
    PlayerPowerUpContact { power_up: EntityId },
}

/// Commands issued by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    SpawnEnemyWithPower { power: u32, kind: EnemyKind },
    SpawnPowerUp,
    RemoveEnemy { enemy: EntityId },
    RemovePowerUp { power_up: EntityId },
    /// Move the player to a fresh random position
    RepositionPlayer,
    UpdateScoreDisplay { score: u64 },
    UpdatePowerDisplay { power_level: u32 },
}

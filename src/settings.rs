//! Game tuning and balance
//!
//! Persisted separately from anything else in LocalStorage (wasm) or read from
//! a JSON file named by `FOREST_BRAWL_TUNING` (native).

use serde::{Deserialize, Serialize};

use crate::ms_to_ticks;

/// Errors produced while loading or validating tuning data
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// The JSON document could not be parsed
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The tuning file could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the simulation cannot use
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Combat and progression rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Standard deviation of enemy power around the player's power
    pub enemy_power_std_dev: f64,
    /// Score awarded per point of defeated enemy power
    pub score_per_enemy_power: u64,
    /// Power gained by the player for each win
    pub win_power_gain: u32,
    /// Power lost by the player for each loss (floored at zero)
    pub loss_power_penalty: u32,
    /// Score awarded for collecting a power-up
    pub power_up_score: u64,
    /// Power awarded for collecting a power-up
    pub power_up_power: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            enemy_power_std_dev: 5.0,
            score_per_enemy_power: 10,
            win_power_gain: 1,
            loss_power_penalty: 2,
            power_up_score: 50,
            power_up_power: 5,
        }
    }
}

/// Full game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub combat: CombatRules,

    // === Arena ===
    /// Arena width in pixels
    pub arena_width: f32,
    /// Arena height in pixels
    pub arena_height: f32,
    /// Minimum distance from the arena edge for spawned entities
    pub spawn_margin: f32,

    // === Cadence ===
    /// Milliseconds between enemy spawns
    pub enemy_spawn_interval_ms: u32,
    /// Milliseconds between power-up spawns
    pub power_up_spawn_interval_ms: u32,

    // === Movement (pixels/s) ===
    pub player_speed: f32,
    pub enemy_base_speed: f32,
    /// Extra enemy speed per point of power
    pub enemy_speed_per_power: f32,

    // === Contact radii ===
    pub player_radius: f32,
    pub enemy_radius: f32,
    pub power_up_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            combat: CombatRules::default(),

            arena_width: 800.0,
            arena_height: 600.0,
            spawn_margin: 50.0,

            enemy_spawn_interval_ms: 1000,
            power_up_spawn_interval_ms: 5000,

            player_speed: 160.0,
            enemy_base_speed: 80.0,
            enemy_speed_per_power: 10.0,

            player_radius: 24.0,
            enemy_radius: 24.0,
            power_up_radius: 16.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let std_dev = self.combat.enemy_power_std_dev;
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(TuningError::Invalid {
                field: "combat.enemy_power_std_dev",
                reason: "must be finite and non-negative",
            });
        }
        if !self.spawn_margin.is_finite() {
            return Err(TuningError::Invalid {
                field: "spawn_margin",
                reason: "must be finite",
            });
        }
        if !self.arena_width.is_finite() || !(self.arena_width > 2.0 * self.spawn_margin) {
            return Err(TuningError::Invalid {
                field: "arena_width",
                reason: "must be finite and exceed twice the spawn margin",
            });
        }
        if !self.arena_height.is_finite() || !(self.arena_height > 2.0 * self.spawn_margin) {
            return Err(TuningError::Invalid {
                field: "arena_height",
                reason: "must be finite and exceed twice the spawn margin",
            });
        }
        if self.spawn_margin < 0.0 {
            return Err(TuningError::Invalid {
                field: "spawn_margin",
                reason: "must be non-negative",
            });
        }
        if self.enemy_spawn_interval_ms == 0 || self.power_up_spawn_interval_ms == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be greater than zero",
            });
        }
        let speeds = [
            self.player_speed,
            self.enemy_base_speed,
            self.enemy_speed_per_power,
        ];
        if speeds.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(TuningError::Invalid {
                field: "speed",
                reason: "must be finite and non-negative",
            });
        }
        let radii = [self.player_radius, self.enemy_radius, self.power_up_radius];
        if radii.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(TuningError::Invalid {
                field: "radius",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Serialize for storage (pretty-printed so the file is hand-editable)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ticks between enemy spawn events
    pub fn enemy_spawn_ticks(&self) -> u32 {
        ms_to_ticks(self.enemy_spawn_interval_ms)
    }

    /// Ticks between power-up spawn events
    pub fn power_up_spawn_ticks(&self) -> u32 {
        ms_to_ticks(self.power_up_spawn_interval_ms)
    }

    /// Chase speed for an enemy of the given power
    pub fn enemy_speed(&self, power: u32) -> f32 {
        self.enemy_base_speed + power as f32 * self.enemy_speed_per_power
    }

    /// LocalStorage key / environment variable
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "forest_brawl_tuning";
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "FOREST_BRAWL_TUNING";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, tuning not saved");
            return;
        };
        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Tuning saved"),
                Err(e) => log::warn!("Failed to save tuning: {:?}", e),
            },
            Err(e) => log::warn!("Failed to serialize tuning: {}", e),
        }
    }

    /// Load tuning from the file named by `FOREST_BRAWL_TUNING`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::load_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Read and validate a tuning file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write to the file named by `FOREST_BRAWL_TUNING`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::debug!("{} not set, tuning not saved", Self::ENV_VAR);
            return;
        };
        match self.save_file(&path) {
            Ok(()) => log::info!("Tuning saved to {}", path),
            Err(e) => log::warn!("Failed to save tuning to {}: {}", path, e),
        }
    }

    /// Write a tuning file that `load_file` can read back
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), TuningError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

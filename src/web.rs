//! Browser boundary
//!
//! Two ways for a JS host to use the crate:
//! - `WebSimulator`: the host engine owns sprites, timers and collisions and
//!   forwards the four inbound events; commands come back as JSON.
//! - `WebGame`: the crate runs the whole arena and the host only draws snapshots.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::Tuning;
use crate::sim::{
    Arena, Command, FrameClock, GameEvent, GameState, SessionStats, Simulator, TickInput,
};

/// Install the console logger and panic hook (idempotent)
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Forest Brawl loaded");
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize for host: {}", e);
        String::from("null")
    })
}

/// Event-in, commands-out simulator for a host-driven game
#[wasm_bindgen]
pub struct WebSimulator {
    sim: Simulator,
    rng: Pcg32,
}

impl WebSimulator {
    fn dispatch(&mut self, event: GameEvent) -> String {
        let mut out: Vec<Command> = Vec::new();
        let _ = self.sim.handle(event, &mut self.rng, &mut out);
        to_json(&out)
    }
}

#[wasm_bindgen]
impl WebSimulator {
    /// A zero seed picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebSimulator {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        let tuning = Tuning::load();
        log::info!("Simulator initialized with seed: {}", seed);
        WebSimulator {
            sim: Simulator::new(tuning.combat),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[wasm_bindgen(js_name = enemySpawnTick)]
    pub fn enemy_spawn_tick(&mut self) -> String {
        self.dispatch(GameEvent::EnemySpawnTick)
    }

    #[wasm_bindgen(js_name = powerUpSpawnTick)]
    pub fn power_up_spawn_tick(&mut self) -> String {
        self.dispatch(GameEvent::PowerUpSpawnTick)
    }

    #[wasm_bindgen(js_name = playerEnemyContact)]
    pub fn player_enemy_contact(&mut self, enemy: u32, enemy_power: u32) -> String {
        self.dispatch(GameEvent::PlayerEnemyContact { enemy, enemy_power })
    }

    #[wasm_bindgen(js_name = playerPowerUpContact)]
    pub fn player_power_up_contact(&mut self, power_up: u32) -> String {
        self.dispatch(GameEvent::PlayerPowerUpContact { power_up })
    }

    /// Dispatch a JSON-encoded event, e.g. `{"type":"EnemySpawnTick"}`
    #[wasm_bindgen(js_name = handleEventJson)]
    pub fn handle_event_json(&mut self, json: &str) -> Result<String, JsValue> {
        let event: GameEvent =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.dispatch(event))
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u64 {
        self.sim.player().score
    }

    #[wasm_bindgen(getter, js_name = powerLevel)]
    pub fn power_level(&self) -> u32 {
        self.sim.player().power_level
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    arena: &'a Arena,
    commands: &'a [Command],
    stats: &'a SessionStats,
    paused: bool,
}

/// Self-contained session; the host feeds keys and frame times and draws snapshots
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, width: f32, height: f32) -> WebGame {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        let mut tuning = Tuning::load();
        tuning.arena_width = width;
        tuning.arena_height = height;
        if let Err(e) = tuning.validate() {
            log::warn!("Arena {}x{} rejected ({}), using defaults", width, height, e);
            tuning = Tuning::default();
        }
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            state: GameState::new(seed, tuning),
            clock: FrameClock::new(),
        }
    }

    /// Advance by a frame of `dt_ms` milliseconds and return a JSON snapshot
    #[allow(clippy::too_many_arguments)]
    pub fn frame(
        &mut self,
        dt_ms: f32,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        pause: bool,
        autopilot: bool,
    ) -> String {
        let input = TickInput {
            up,
            down,
            left,
            right,
            pause,
            autopilot,
        };
        let _ = self.clock.advance(&mut self.state, &input, dt_ms / 1000.0);
        to_json(&Snapshot {
            arena: &self.state.arena,
            commands: &self.state.last_commands,
            stats: &self.state.stats,
            paused: self.state.phase == crate::sim::GamePhase::Paused,
        })
    }

    /// Replace the tuning, persist it and start a fresh session on the same seed
    ///
    /// Missing fields take defaults. Invalid JSON or values are returned as an
    /// error and the current session is left untouched.
    #[wasm_bindgen(js_name = setTuningJson)]
    pub fn set_tuning_json(&mut self, json: &str) -> Result<(), JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        tuning.save();
        let seed = self.state.seed;
        self.state = GameState::new(seed, tuning);
        self.clock.reset();
        log::info!("Tuning replaced, session restarted with seed: {}", seed);
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = tuningJson)]
    pub fn tuning_json(&self) -> String {
        to_json(&self.state.tuning)
    }

    /// Start over with a new seed
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.clock.reset();
        log::info!("Game restarted with seed: {}", seed);
    }
}

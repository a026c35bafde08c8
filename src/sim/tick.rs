//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically: movement, spawn
//! timers, contact detection, then the simulator and its commands.

use glam::Vec2;

use super::combat::CombatOutcome;
use super::event::GameEvent;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - AI steers the player
    pub autopilot: bool,
}

impl TickInput {
    /// Movement direction in screen space (y grows downward)
    ///
    /// Left wins over right and up wins over down when both are held.
    pub fn direction(&self) -> Vec2 {
        let x = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let y = if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        toggle_pause(state);
    }

    state.last_commands.clear();
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    // Move
    let dir = if input.autopilot {
        autopilot_direction(state)
    } else {
        input.direction()
    };
    state.arena.steer_player(dir, state.tuning.player_speed);
    state.arena.step(dt, &state.tuning);

    // Spawn timers
    let mut events = Vec::new();
    state.enemy_timer += 1;
    if state.enemy_timer >= state.tuning.enemy_spawn_ticks() {
        state.enemy_timer = 0;
        events.push(GameEvent::EnemySpawnTick);
    }
    state.power_up_timer += 1;
    if state.power_up_timer >= state.tuning.power_up_spawn_ticks() {
        state.power_up_timer = 0;
        events.push(GameEvent::PowerUpSpawnTick);
    }

    // Contacts
    events.extend(state.arena.contacts(&state.tuning));

    // Resolve and carry out
    let mut commands = std::mem::take(&mut state.last_commands);
    let mut knocked_back = false;
    for event in events {
        // Contacts were measured where the player stood before being knocked back
        let is_contact = matches!(
            event,
            GameEvent::PlayerEnemyContact { .. } | GameEvent::PlayerPowerUpContact { .. }
        );
        if knocked_back && is_contact {
            continue;
        }
        if let Some(outcome) = state.sim.handle(event, &mut state.rng, &mut commands) {
            state.stats.record_outcome(outcome);
            knocked_back = outcome == CombatOutcome::EnemyWins;
        }
    }
    for command in &commands {
        state.stats.record_command(command);
    }
    state.arena.apply(&commands, &state.tuning, &mut state.rng);
    state.last_commands = commands;
}

/// Flip between playing and paused
pub fn toggle_pause(state: &mut GameState) {
    state.phase = match state.phase {
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
    };
    log::info!("Phase: {:?}", state.phase);
}

/// Danger radius the autopilot keeps from enemies it cannot beat
const FLEE_RADIUS: f32 = 140.0;

/// Pick a direction for demo play
///
/// Runs from the closest unbeatable enemy if it is near, otherwise heads for
/// the closest power-up or beatable enemy. Stays put when there is nothing to do.
fn autopilot_direction(state: &GameState) -> Vec2 {
    let pos = state.arena.player.pos;
    let power = state.player().power_level;

    let threat = state
        .arena
        .enemies
        .iter()
        .filter(|e| e.power >= power)
        .map(|e| (e.pos, e.pos.distance(pos)))
        .filter(|(_, d)| *d < FLEE_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((threat_pos, _)) = threat {
        return quantize(pos - threat_pos);
    }

    let target = state
        .arena
        .power_ups
        .iter()
        .map(|p| p.pos)
        .chain(
            state
                .arena
                .enemies
                .iter()
                .filter(|e| e.power < power)
                .map(|e| e.pos),
        )
        .min_by(|a, b| {
            a.distance(pos)
                .partial_cmp(&b.distance(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match target {
        Some(target) => quantize(target - pos),
        None => Vec2::ZERO,
    }
}

/// Snap a desired heading to the 8 keyboard directions
fn quantize(v: Vec2) -> Vec2 {
    const DEADZONE: f32 = 4.0;
    let axis = |c: f32| {
        if c > DEADZONE {
            1.0
        } else if c < -DEADZONE {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(axis(v.x), axis(v.y))
}

/// Real-time frame driver with a fixed-step accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` seconds allow
    ///
    /// A pause toggle in `input` is applied once per frame, even when the
    /// frame is too short for a tick. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        let mut input = input.clone();
        if input.pause {
            toggle_pause(state);
            input.pause = false;
        }

        // NaN or infinite deltas from the host count as an empty frame
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Tuning;
    use crate::sim::arena::{Enemy, PowerUp};
    use crate::sim::combat::{EnemyKind, PlayerState};
    use crate::sim::event::Command;

    fn idle_state(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default())
    }

    #[test]
    fn test_direction_precedence() {
        let input = TickInput {
            left: true,
            right: true,
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(-1.0, -1.0));

        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = idle_state(12345);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);

        // Paused ticks do nothing
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);

        // Unpause
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_enemy_spawns_every_second() {
        let mut state = idle_state(1);
        let input = TickInput::default();

        for _ in 0..119 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.stats.enemies_spawned, 0);

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.stats.enemies_spawned, 1);
        assert!(
            state
                .last_commands
                .iter()
                .any(|c| matches!(c, Command::SpawnEnemyWithPower { .. }))
        );
    }

    #[test]
    fn test_power_up_spawns_every_five_seconds() {
        let mut state = idle_state(2);
        let input = TickInput::default();
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.stats.power_ups_spawned, 1);
        assert_eq!(state.stats.enemies_spawned, 5);
    }

    #[test]
    fn test_contact_with_weaker_enemy_scores() {
        let mut state = idle_state(3);
        state.sim = state.sim.clone().with_player(PlayerState {
            power_level: 10,
            score: 0,
        });
        let pos = state.arena.player.pos;
        let id = state.arena.next_entity_id();
        state.arena.enemies.push(Enemy {
            id,
            kind: EnemyKind::Orc,
            power: 3,
            pos,
            vel: Vec2::ZERO,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player(), PlayerState { power_level: 11, score: 30 });
        assert!(state.arena.enemy(id).is_none());
        assert_eq!(state.arena.hud.score, 30);
        assert_eq!(state.arena.hud.power_level, 11);
        assert_eq!(state.stats.wins, 1);
    }

    #[test]
    fn test_contact_with_stronger_enemy_repositions() {
        let mut state = idle_state(4);
        state.sim = state.sim.clone().with_player(PlayerState {
            power_level: 1,
            score: 0,
        });
        let pos = state.arena.player.pos;
        let id = state.arena.next_entity_id();
        state.arena.enemies.push(Enemy {
            id,
            kind: EnemyKind::Dragon,
            power: 9,
            pos,
            vel: Vec2::ZERO,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player().power_level, 0);
        assert!(state.arena.enemy(id).is_some());
        assert!(state.last_commands.contains(&Command::RepositionPlayer));
        assert_eq!(state.stats.losses, 1);
    }

    #[test]
    fn test_power_up_pickup() {
        let mut state = idle_state(5);
        let pos = state.arena.player.pos;
        let id = state.arena.next_entity_id();
        state.arena.power_ups.push(PowerUp { id, pos });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.player(), PlayerState { power_level: 5, score: 50 });
        assert!(state.arena.power_ups.is_empty());
        assert_eq!(state.stats.power_ups_collected, 1);
    }

    #[test]
    fn test_autopilot_flees_and_chases() {
        let mut state = idle_state(6);
        state.arena.player.pos = Vec2::new(400.0, 300.0);
        let id = state.arena.next_entity_id();
        state.arena.enemies.push(Enemy {
            id,
            kind: EnemyKind::Yeti,
            power: 4,
            pos: Vec2::new(460.0, 300.0),
            vel: Vec2::ZERO,
        });

        // Power 0 cannot beat it: run left
        assert_eq!(autopilot_direction(&state), Vec2::new(-1.0, 0.0));

        // Power 10 can: go get it
        state.sim = state.sim.clone().with_player(PlayerState {
            power_level: 10,
            score: 0,
        });
        assert_eq!(autopilot_direction(&state), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut state = idle_state(8);
        let mut clock = FrameClock::new();

        // Half a tick: nothing yet
        assert_eq!(clock.advance(&mut state, &TickInput::default(), SIM_DT * 0.5), 0);
        // Completes the first tick
        assert_eq!(clock.advance(&mut state, &TickInput::default(), SIM_DT * 0.6), 1);
        // Huge frame is capped
        assert!(clock.advance(&mut state, &TickInput::default(), 5.0) <= MAX_SUBSTEPS);

        // Pause lands even on a frame too short to tick
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        clock.reset();
        assert_eq!(clock.advance(&mut state, &pause, 0.0), 0);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_frame_clock_survives_bad_frame_dt() {
        let mut state = idle_state(10);
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(&mut state, &TickInput::default(), f32::NAN), 0);
        assert_eq!(clock.advance(&mut state, &TickInput::default(), f32::INFINITY), 0);

        let ticks: u32 = (0..10)
            .map(|_| clock.advance(&mut state, &TickInput::default(), 1.0 / 60.0))
            .sum();
        assert!(ticks >= 19, "only {} ticks after a bad frame", ticks);
    }

    #[test]
    fn test_knockback_ends_contacts_for_the_tick() {
        let mut state = idle_state(11);
        state.sim = state.sim.clone().with_player(PlayerState {
            power_level: 10,
            score: 0,
        });
        let pos = state.arena.player.pos;
        for _ in 0..3 {
            let id = state.arena.next_entity_id();
            state.arena.enemies.push(Enemy {
                id,
                kind: EnemyKind::Dragon,
                power: 50,
                pos,
                vel: Vec2::ZERO,
            });
        }
        let chest = state.arena.next_entity_id();
        state.arena.power_ups.push(PowerUp { id: chest, pos });

        tick(&mut state, &TickInput::default(), SIM_DT);

        // One loss only, and the chest left behind is not collected
        assert_eq!(state.player().power_level, 8);
        assert_eq!(state.stats.losses, 1);
        assert_eq!(
            state
                .last_commands
                .iter()
                .filter(|c| **c == Command::RepositionPlayer)
                .count(),
            1
        );
        assert_eq!(state.arena.power_ups.len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = idle_state(99999);
        let mut state2 = idle_state(99999);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..(120 * 30) {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.player(), state2.player());
        assert_eq!(state1.stats, state2.stats);
        assert_eq!(state1.arena.enemies.len(), state2.arena.enemies.len());
        assert_eq!(state1.arena.player.pos, state2.arena.player.pos);
        assert_eq!(state1.arena.hud.score, state1.player().score);
    }
}

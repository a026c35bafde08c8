//! Event-driven front end for the combat rules
//!
//! The host pushes [`GameEvent`]s in, the simulator updates its [`PlayerState`]
//! and appends [`Command`]s for the host to carry out.

use super::combat::{
    CombatOutcome, PlayerState, collect_power_up, on_enemy_spawn_tick, resolve_encounter,
};
use super::event::{Command, GameEvent};
use super::random::UniformSource;
use crate::settings::CombatRules;

/// Combat and progression simulator for one session
#[derive(Debug, Clone)]
pub struct Simulator {
    player: PlayerState,
    rules: CombatRules,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(CombatRules::default())
    }
}

impl Simulator {
    pub fn new(rules: CombatRules) -> Self {
        Self {
            player: PlayerState::new(),
            rules,
        }
    }

    /// Resume from an existing player state
    pub fn with_player(mut self, player: PlayerState) -> Self {
        self.player = player;
        self
    }

    pub fn player(&self) -> PlayerState {
        self.player
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// Handle one event, appending the resulting commands to `out`
    ///
    /// Returns the combat outcome for contact events.
    pub fn handle<R: UniformSource + ?Sized>(
        &mut self,
        event: GameEvent,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> Option<CombatOutcome> {
        match event {
            GameEvent::EnemySpawnTick => {
                let spec = on_enemy_spawn_tick(self.player.power_level, &self.rules, rng);
                log::debug!(
                    "Spawning {} with power {} (player power {})",
                    spec.kind.as_str(),
                    spec.power_level,
                    self.player.power_level
                );
                out.push(Command::SpawnEnemyWithPower {
                    power: spec.power_level,
                    kind: spec.kind,
                });
                None
            }
            GameEvent::PowerUpSpawnTick => {
                out.push(Command::SpawnPowerUp);
                None
            }
            GameEvent::PlayerEnemyContact { enemy, enemy_power } => {
                let encounter = resolve_encounter(self.player, enemy_power, &self.rules);
                self.player = encounter.state;

                match encounter.outcome {
                    CombatOutcome::PlayerWins => {
                        log::debug!(
                            "Defeated enemy {} (power {}), +{} score",
                            enemy,
                            enemy_power,
                            encounter.score_delta
                        );
                        out.push(Command::RemoveEnemy { enemy });
                    }
                    CombatOutcome::EnemyWins => {
                        log::debug!(
                            "Beaten by enemy {} (power {}), power now {}",
                            enemy,
                            enemy_power,
                            self.player.power_level
                        );
                        out.push(Command::RepositionPlayer);
                    }
                    CombatOutcome::Tie => {}
                }

                self.push_displays(out);
                Some(encounter.outcome)
            }
            GameEvent::PlayerPowerUpContact { power_up } => {
                self.player = collect_power_up(self.player, &self.rules);
                log::debug!("Collected power-up {}", power_up);
                out.push(Command::RemovePowerUp { power_up });
                self.push_displays(out);
                None
            }
        }
    }

    /// Handle a queue of events in order
    pub fn handle_all<R: UniformSource + ?Sized>(
        &mut self,
        events: &[GameEvent],
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let _ = self.handle(*event, rng, out);
        }
    }

    fn push_displays(&self, out: &mut Vec<Command>) {
        out.push(Command::UpdateScoreDisplay {
            score: self.player.score,
        });
        out.push(Command::UpdatePowerDisplay {
            power_level: self.player.power_level,
        });
    }
}

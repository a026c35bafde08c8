//! Arena entities, movement and contact detection
//!
//! This is the simulator's collaborator: it owns positions, turns overlaps
//! into [`GameEvent`]s and carries out the [`Command`]s that come back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::EnemyKind;
use super::event::{Command, EntityId, GameEvent};
use super::random::{UniformSource, range_inclusive};
use crate::settings::Tuning;

/// The player-controlled knight
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// An enemy travelling along its spawn heading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub power: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A collectible power-up (treasure chest)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub pos: Vec2,
}

/// Values the host should currently be displaying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub power_level: u32,
}

/// Rectangular play field with everything in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    /// Sorted by id
    pub power_ups: Vec<PowerUp>,
    pub hud: Hud,
    next_id: EntityId,
}

impl Arena {
    /// Create an empty arena with the player at a random position
    pub fn new<R: UniformSource + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let mut arena = Self {
            width: tuning.arena_width,
            height: tuning.arena_height,
            player: Player::default(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            hud: Hud::default(),
            next_id: 1,
        };
        arena.player.pos = arena.random_spawn(tuning.spawn_margin, rng);
        arena
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random whole-pixel position at least `margin` away from every edge
    pub fn random_spawn<R: UniformSource + ?Sized>(&self, margin: f32, rng: &mut R) -> Vec2 {
        let x = range_inclusive(
            margin.round() as i64,
            (self.width - margin).round() as i64,
            rng,
        );
        let y = range_inclusive(
            margin.round() as i64,
            (self.height - margin).round() as i64,
            rng,
        );
        Vec2::new(x as f32, y as f32)
    }

    /// Set player velocity from a direction (each axis -1, 0 or 1)
    pub fn steer_player(&mut self, dir: Vec2, speed: f32) {
        self.player.vel = Vec2::new(axis(dir.x), axis(dir.y)) * speed;
    }

    /// Advance positions by `dt` seconds
    ///
    /// The player is kept inside the arena. Enemies keep their heading and are
    /// dropped once they leave the arena by more than the spawn margin.
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        let r = tuning.player_radius;
        let p = &mut self.player;
        p.pos += p.vel * dt;
        p.pos.x = p.pos.x.clamp(r.min(self.width / 2.0), (self.width - r).max(self.width / 2.0));
        p.pos.y = p
            .pos
            .y
            .clamp(r.min(self.height / 2.0), (self.height - r).max(self.height / 2.0));

        for enemy in &mut self.enemies {
            enemy.pos += enemy.vel * dt;
        }

        let m = tuning.spawn_margin;
        let (w, h) = (self.width, self.height);
        let before = self.enemies.len();
        self.enemies.retain(|e| {
            e.pos.x >= -m && e.pos.x <= w + m && e.pos.y >= -m && e.pos.y <= h + m
        });
        let culled = before - self.enemies.len();
        if culled > 0 {
            log::debug!("Culled {} enemies that left the arena", culled);
        }
    }

    /// Contact events for everything currently overlapping the player (id order)
    pub fn contacts(&self, tuning: &Tuning) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let pos = self.player.pos;

        let enemy_reach = tuning.player_radius + tuning.enemy_radius;
        for enemy in &self.enemies {
            if enemy.pos.distance_squared(pos) < enemy_reach * enemy_reach {
                events.push(GameEvent::PlayerEnemyContact {
                    enemy: enemy.id,
                    enemy_power: enemy.power,
                });
            }
        }

        let power_up_reach = tuning.player_radius + tuning.power_up_radius;
        for power_up in &self.power_ups {
            if power_up.pos.distance_squared(pos) < power_up_reach * power_up_reach {
                events.push(GameEvent::PlayerPowerUpContact {
                    power_up: power_up.id,
                });
            }
        }

        events
    }

    /// Carry out simulator commands
    pub fn apply<R: UniformSource + ?Sized>(
        &mut self,
        commands: &[Command],
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for command in commands {
            match *command {
                Command::SpawnEnemyWithPower { power, kind } => {
                    let id = self.next_entity_id();
                    let pos = self.random_spawn(tuning.spawn_margin, rng);
                    // Heads for where the player is now, not where they will be
                    let heading = (self.player.pos - pos).normalize_or_zero();
                    let vel = heading * tuning.enemy_speed(power);
                    self.enemies.push(Enemy {
                        id,
                        kind,
                        power,
                        pos,
                        vel,
                    });
                }
                Command::SpawnPowerUp => {
                    let id = self.next_entity_id();
                    let pos = self.random_spawn(tuning.spawn_margin, rng);
                    self.power_ups.push(PowerUp { id, pos });
                }
                Command::RemoveEnemy { enemy } => {
                    self.enemies.retain(|e| e.id != enemy);
                }
                Command::RemovePowerUp { power_up } => {
                    self.power_ups.retain(|p| p.id != power_up);
                }
                Command::RepositionPlayer => {
                    self.player.pos = self.random_spawn(tuning.spawn_margin, rng);
                }
                Command::UpdateScoreDisplay { score } => {
                    self.hud.score = score;
                }
                Command::UpdatePowerDisplay { power_level } => {
                    self.hud.power_level = power_level;
                }
            }
        }
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}

/// -1, 0 or 1 (unlike `f32::signum`, zero stays zero)
#[inline]
fn axis(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::FixedDraws;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena_with_player_at(pos: Vec2) -> Arena {
        let tuning = Tuning::default();
        let mut rng = FixedDraws::new([0.5]);
        let mut arena = Arena::new(&tuning, &mut rng);
        arena.player.pos = pos;
        arena
    }

    #[test]
    fn test_random_spawn_respects_margin() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let arena = Arena::new(&tuning, &mut rng);
        for _ in 0..2000 {
            let p = arena.random_spawn(50.0, &mut rng);
            assert!(p.x >= 50.0 && p.x <= 750.0);
            assert!(p.y >= 50.0 && p.y <= 550.0);
            assert_eq!(p.x, p.x.round());
        }
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let tuning = Tuning::default();
        let mut arena = arena_with_player_at(Vec2::new(30.0, 300.0));
        arena.steer_player(Vec2::new(-1.0, 0.0), tuning.player_speed);
        for _ in 0..120 {
            arena.step(1.0 / 120.0, &tuning);
        }
        assert_eq!(arena.player.pos.x, tuning.player_radius);
        assert_eq!(arena.player.pos.y, 300.0);
    }

    #[test]
    fn test_steer_is_axis_aligned_speed() {
        let mut arena = arena_with_player_at(Vec2::new(400.0, 300.0));
        arena.steer_player(Vec2::new(0.3, -7.0), 160.0);
        assert_eq!(arena.player.vel, Vec2::new(160.0, -160.0));
        arena.steer_player(Vec2::ZERO, 160.0);
        assert_eq!(arena.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_spawned_enemy_heads_for_player() {
        let tuning = Tuning::default();
        let mut arena = arena_with_player_at(Vec2::new(400.0, 300.0));
        // 1.0 -> lowest coordinate on both axes: (50, 50)
        let mut rng = FixedDraws::new([1.0]);
        arena.apply(
            &[Command::SpawnEnemyWithPower {
                power: 4,
                kind: EnemyKind::Orc,
            }],
            &tuning,
            &mut rng,
        );

        let enemy = &arena.enemies[0];
        assert_eq!(enemy.pos, Vec2::new(50.0, 50.0));
        assert!((enemy.vel.length() - 120.0).abs() < 1e-3);
        let heading = (arena.player.pos - enemy.pos).normalize();
        assert!(enemy.vel.normalize().dot(heading) > 0.999);
    }

    #[test]
    fn test_contacts_and_removal() {
        let tuning = Tuning::default();
        let mut arena = arena_with_player_at(Vec2::new(400.0, 300.0));
        let near = arena.next_entity_id();
        let far = arena.next_entity_id();
        let chest = arena.next_entity_id();
        arena.enemies.push(Enemy {
            id: near,
            kind: EnemyKind::Yeti,
            power: 2,
            pos: Vec2::new(420.0, 300.0),
            vel: Vec2::ZERO,
        });
        arena.enemies.push(Enemy {
            id: far,
            kind: EnemyKind::Dragon,
            power: 9,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
        });
        arena.power_ups.push(PowerUp {
            id: chest,
            pos: Vec2::new(400.0, 330.0),
        });

        let events = arena.contacts(&tuning);
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerEnemyContact {
                    enemy: near,
                    enemy_power: 2
                },
                GameEvent::PlayerPowerUpContact { power_up: chest },
            ]
        );

        let mut rng = FixedDraws::new([0.5]);
        arena.apply(
            &[
                Command::RemoveEnemy { enemy: near },
                Command::RemovePowerUp { power_up: chest },
                Command::UpdateScoreDisplay { score: 70 },
                Command::UpdatePowerDisplay { power_level: 6 },
            ],
            &tuning,
            &mut rng,
        );
        assert!(arena.enemy(near).is_none());
        assert!(arena.enemy(far).is_some());
        assert!(arena.power_ups.is_empty());
        assert_eq!(arena.hud, Hud { score: 70, power_level: 6 });
    }

    #[test]
    fn test_enemies_culled_after_leaving() {
        let tuning = Tuning::default();
        let mut arena = arena_with_player_at(Vec2::new(400.0, 300.0));
        let id = arena.next_entity_id();
        arena.enemies.push(Enemy {
            id,
            kind: EnemyKind::Orc,
            power: 1,
            pos: Vec2::new(790.0, 300.0),
            vel: Vec2::new(100.0, 0.0),
        });
        arena.step(0.5, &tuning);
        assert_eq!(arena.enemies.len(), 1);
        arena.step(0.5, &tuning);
        assert!(arena.enemies.is_empty());
    }

    #[test]
    fn test_reposition_player() {
        let tuning = Tuning::default();
        let mut arena = arena_with_player_at(Vec2::new(400.0, 300.0));
        let mut rng = FixedDraws::new([1.0]);
        arena.apply(&[Command::RepositionPlayer], &tuning, &mut rng);
        assert_eq!(arena.player.pos, Vec2::new(50.0, 50.0));
    }
}

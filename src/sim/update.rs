//! Per-tick entity movement, boss behaviour and enemy fire
//!
//! Bullet, enemy, power-up and particle displacement is a flat per-tick step
//! tied to the frame rate. Only particle life is scaled by `dt`.

use glam::Vec3;

use super::geometry::is_out_of_bounds;
use super::rng::RandomSource;
use super::state::{BossPhase, Bullet, BulletOwner, Enemy, EnemyKind, GameEvent, GameState};
use crate::Millis;
use crate::consts::*;

/// Boss phase thresholds (fraction of max health)
pub const PHASE_TWO_BELOW: f32 = 0.6;
pub const PHASE_THREE_BELOW: f32 = 0.3;
pub const PHASE_TWO_SPEEDUP: f32 = 1.2;
pub const PHASE_THREE_SPEEDUP: f32 = 1.3;
/// Shield may regenerate only below this health fraction
pub const SHIELD_REGEN_BELOW: f32 = 0.5;

/// Per-tick fire chance and minimum delay between shots
pub const BOSS_FIRE_CHANCE: f32 = 0.003;
pub const ENEMY_FIRE_CHANCE: f32 = 0.001;
pub const BOSS_FIRE_DELAY_MS: Millis = 500;
pub const ENEMY_FIRE_DELAY_MS: Millis = 1000;

/// Enemy projectile damage by shooter
pub const RAPID_BULLET_DAMAGE: f32 = 15.0;
pub const SPREAD_BULLET_DAMAGE: f32 = 25.0;
pub const BOSS_BULLET_DAMAGE: f32 = 30.0;
pub const ENEMY_BULLET_DAMAGE: f32 = 20.0;

/// A bullet about to be spawned by an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
struct Shot {
    pos: Vec3,
    vel: Vec3,
    damage: f32,
}

/// Move bullets and drop those that left the arena
pub fn update_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(|b| !is_out_of_bounds(b.pos));
}

/// March enemies, advance boss phases and shields, and roll enemy fire
pub fn update_enemies(state: &mut GameState, rng: &mut dyn RandomSource, now: Millis) {
    let regen_cooldown = state.tuning.shield_regen_cooldown_ms;
    let mut shots = Vec::new();

    for enemy in state.enemies.iter_mut() {
        march(enemy);

        if let Some(phase) = advance_boss_phase(enemy) {
            log::debug!("Boss {} entered phase {}", enemy.id, phase.number());
            state.events.push(GameEvent::BossPhaseChanged {
                id: enemy.id,
                phase,
            });
        }
        regenerate_shield(enemy, now, regen_cooldown);

        let (chance, delay) = if enemy.kind.is_boss() {
            (BOSS_FIRE_CHANCE, BOSS_FIRE_DELAY_MS)
        } else {
            (ENEMY_FIRE_CHANCE, ENEMY_FIRE_DELAY_MS)
        };
        if rng.next_f32() < chance && now.saturating_sub(enemy.last_shot) > delay {
            shots.extend(volley(enemy));
            enemy.last_shot = now;
        }
    }

    for shot in shots {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: shot.pos,
            vel: shot.vel,
            owner: BulletOwner::Enemy,
            damage: shot.damage,
        });
    }
}

/// Move power-ups and drop those that left the arena
pub fn update_power_ups(state: &mut GameState) {
    for power_up in &mut state.power_ups {
        power_up.pos += power_up.vel;
    }
    state.power_ups.retain(|p| !is_out_of_bounds(p.pos));
}

/// Move particles and age them by `dt` seconds
pub fn update_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Horizontal march; at an edge reverse and step down
fn march(enemy: &mut Enemy) {
    enemy.pos.x += enemy.direction * enemy.speed;
    if enemy.pos.x <= ARENA_LEFT || enemy.pos.x >= ARENA_RIGHT {
        enemy.direction = -enemy.direction;
        enemy.pos.y -= ENEMY_DESCENT;
    }
}

/// Step a boss at most one phase forward. Returns the new phase if it changed.
fn advance_boss_phase(enemy: &mut Enemy) -> Option<BossPhase> {
    let fraction = enemy.health_fraction();
    let boss = enemy.boss.as_mut()?;
    let (next, speedup) = match boss.phase {
        BossPhase::One if fraction < PHASE_TWO_BELOW => (BossPhase::Two, PHASE_TWO_SPEEDUP),
        BossPhase::Two if fraction < PHASE_THREE_BELOW => (BossPhase::Three, PHASE_THREE_SPEEDUP),
        _ => return None,
    };
    boss.phase = next;
    enemy.speed *= speedup;
    Some(next)
}

/// Bring a broken boss shield back once the cooldown has passed
fn regenerate_shield(enemy: &mut Enemy, now: Millis, cooldown: Millis) {
    let fraction = enemy.health_fraction();
    let Some(shield) = enemy.boss.as_mut().and_then(|b| b.shield.as_mut()) else {
        return;
    };
    if shield.active || fraction >= SHIELD_REGEN_BELOW {
        return;
    }
    let cooled = shield
        .broke_at
        .is_none_or(|t| now.saturating_sub(t) > cooldown);
    if cooled {
        shield.active = true;
    }
}

/// Bullets fired by one enemy volley
fn volley(enemy: &Enemy) -> Vec<Shot> {
    let muzzle = Vec3::new(enemy.pos.x, enemy.pos.y - 0.5, enemy.pos.z);
    match enemy.kind {
        EnemyKind::BossRapid => (-1..=1)
            .map(|i| {
                let i = i as f32;
                Shot {
                    pos: muzzle + Vec3::new(i * 0.4, 0.0, 0.0),
                    vel: Vec3::new(i * 0.05, -0.18, 0.0),
                    damage: RAPID_BULLET_DAMAGE,
                }
            })
            .collect(),
        EnemyKind::BossTank => [-30.0f32, 0.0, 30.0]
            .iter()
            .map(|deg| {
                let rad = deg.to_radians();
                Shot {
                    pos: muzzle,
                    vel: Vec3::new(rad.sin() * 0.15, -rad.cos() * 0.15, 0.0),
                    damage: SPREAD_BULLET_DAMAGE,
                }
            })
            .collect(),
        EnemyKind::Boss | EnemyKind::BossShield => vec![Shot {
            pos: muzzle,
            vel: Vec3::new(0.0, -0.15, 0.0),
            damage: BOSS_BULLET_DAMAGE,
        }],
        EnemyKind::Basic | EnemyKind::Fast | EnemyKind::Tank => vec![Shot {
            pos: muzzle,
            vel: Vec3::new(0.0, -0.15, 0.0),
            damage: ENEMY_BULLET_DAMAGE,
        }],
    }
}

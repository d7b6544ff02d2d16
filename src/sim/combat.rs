//! Collision resolution: hits, kills, drops and pickups
//!
//! Resolution order per tick:
//! 1. Player bullets vs enemies
//! 2. Enemy bullets vs player
//! 3. Player vs power-ups
//!
//! A bullet is consumed by the first target it overlaps, and an enemy
//! destroyed earlier in the tick can't be hit again.

use glam::Vec3;

use super::geometry::{
    BOSS_EXPLOSION_COLOR, EXPLOSION_COLOR, circles_overlap, explosion_particles,
};
use super::rng::RandomSource;
use super::state::{Enemy, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind};
use crate::Millis;
use crate::consts::*;

/// Particles per explosion
pub const EXPLOSION_PARTICLES: usize = 15;
pub const BOSS_EXPLOSION_PARTICLES: usize = 30;
/// Drift of a dropped power-up (per tick)
pub const POWER_UP_DRIFT: Vec3 = Vec3::new(0.0, -0.02, 0.0);

/// Run all collision passes for this tick
pub fn resolve_collisions(state: &mut GameState, rng: &mut dyn RandomSource, now: Millis) {
    resolve_player_bullets(state, rng, now);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_enemy_bullets(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_power_ups(state, now);
}

/// Player bullets vs enemies
pub fn resolve_player_bullets(state: &mut GameState, rng: &mut dyn RandomSource, now: Millis) {
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        if !bullet.is_player() {
            i += 1;
            continue;
        }
        let pos = bullet.pos;
        let target = state
            .enemies
            .iter()
            .position(|e| circles_overlap(pos, BULLET_RADIUS, e.pos, ENEMY_RADIUS));
        match target {
            Some(idx) => {
                let bullet = state.bullets.remove(i);
                damage_enemy(state, idx, bullet.damage, rng, now);
            }
            None => i += 1,
        }
    }
}

/// Apply a hit to `state.enemies[idx]`, destroying it if health runs out
fn damage_enemy(
    state: &mut GameState,
    idx: usize,
    damage: f32,
    rng: &mut dyn RandomSource,
    now: Millis,
) {
    let factor = state.tuning.shield_damage_factor;
    let break_chance = state.tuning.shield_break_chance;

    let enemy = &mut state.enemies[idx];
    let mut damage = damage.max(0.0);
    let mut shield_broken = false;
    let shield = enemy
        .boss
        .as_mut()
        .and_then(|b| b.shield.as_mut())
        .filter(|s| s.active);
    if let Some(shield) = shield {
        damage *= factor;
        if rng.next_f32() < break_chance {
            shield.active = false;
            shield.broke_at = Some(now);
            shield_broken = true;
        }
    }
    enemy.health -= damage;

    let (id, kind, alive) = (enemy.id, enemy.kind, enemy.health > 0.0);
    if shield_broken {
        log::debug!("Boss {id} shield broken");
        state.events.push(GameEvent::BossShieldBroken { id });
    }
    if alive {
        state.events.push(GameEvent::EnemyHit { id, kind });
        return;
    }

    let enemy = state.enemies.remove(idx);
    destroy_enemy(state, enemy, rng);
}

/// Award score, spawn the explosion and maybe drop a power-up
fn destroy_enemy(state: &mut GameState, enemy: Enemy, rng: &mut dyn RandomSource) {
    let score = enemy.kind.pattern().score;
    state.add_score(score);
    state.enemies_defeated += 1;
    state.events.push(GameEvent::EnemyDestroyed {
        id: enemy.id,
        kind: enemy.kind,
        score,
    });

    let (count, color) = if enemy.kind.is_boss() {
        log::info!("Boss {:?} destroyed (+{score})", enemy.kind);
        (BOSS_EXPLOSION_PARTICLES, BOSS_EXPLOSION_COLOR)
    } else {
        (EXPLOSION_PARTICLES, EXPLOSION_COLOR)
    };
    let particles = explosion_particles(enemy.pos, count, color, rng, || state.next_entity_id());
    state.add_particles(particles);

    if rng.next_f32() < state.tuning.drop_chance {
        let kind = PowerUpKind::ALL[rng.next_index(PowerUpKind::ALL.len())];
        let id = state.next_entity_id();
        state.add_power_up(PowerUp {
            id,
            kind,
            pos: enemy.pos,
            vel: POWER_UP_DRIFT,
        });
    }
}

/// Enemy bullets vs player
pub fn resolve_enemy_bullets(state: &mut GameState) {
    let player_pos = state.player.pos;
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        if bullet.is_player()
            || !circles_overlap(bullet.pos, BULLET_RADIUS, player_pos, PLAYER_RADIUS)
        {
            i += 1;
            continue;
        }

        let bullet = state.bullets.remove(i);
        state.take_damage(bullet.damage);
        state.events.push(GameEvent::PlayerHit {
            damage: bullet.damage,
        });

        if state.player.health <= 0.0 {
            state.remove_life();
            if state.phase == GamePhase::GameOver {
                return;
            }
            state.player.health = state.player.max_health;
            state.player.shield = 0.0;
        }
    }
}

/// Player vs power-ups
pub fn resolve_power_ups(state: &mut GameState, now: Millis) {
    let player_pos = state.player.pos;
    let touched: Vec<u32> = state
        .power_ups
        .iter()
        .filter(|p| circles_overlap(p.pos, POWER_UP_RADIUS, player_pos, PLAYER_RADIUS))
        .map(|p| p.id)
        .collect();
    for id in touched {
        state.collect_power_up(id, now);
    }
}

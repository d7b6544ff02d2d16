//! Frame-driven simulation tick
//!
//! Core game loop: applies input, advances every entity by one frame,
//! resolves collisions and drives wave progression.

use super::combat::resolve_collisions;
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, GameState, WaveTransition};
use super::update::{update_bullets, update_enemies, update_particles, update_power_ups};
use super::wave::create_wave;
use crate::Millis;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal axis (-1 = left held, +1 = right held)
    pub move_axis: f32,
    /// Fire button held
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame of `dt` seconds ending at `now`
///
/// Events raised by the frame are appended to `state.events`. Hosts that
/// drive `tick` directly must drain them (see `Session::drain_events`).
/// A non-finite `dt` skips the frame; a negative one counts as zero.
pub fn tick(
    state: &mut GameState,
    rng: &mut dyn RandomSource,
    input: &TickInput,
    dt: f32,
    now: Millis,
) {
    if !dt.is_finite() {
        return;
    }
    let dt = dt.max(0.0);

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => {
                state.resume();
            }
            _ => {}
        }
    }

    // Don't tick outside of play
    if state.phase != GamePhase::Playing {
        return;
    }

    advance_wave(state, rng, now);

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    if input.move_axis != 0.0 {
        let axis = input.move_axis.clamp(-1.0, 1.0);
        state.move_player(axis * dt * state.tuning.player_move_speed);
    }
    if input.shoot {
        state.player_shoot(now);
    }

    update_bullets(state);
    update_enemies(state, rng, now);
    resolve_collisions(state, rng, now);
    if state.phase != GamePhase::Playing {
        return;
    }
    update_power_ups(state);
    update_particles(state, dt);

    check_wave_clear(state, now);
    check_invasion(state);
}

/// Fire a due level transition, then spawn the level's wave if it isn't out yet
fn advance_wave(state: &mut GameState, rng: &mut dyn RandomSource, now: Millis) {
    if let Some(transition) = state.wave_transition {
        if now < transition.fires_at {
            return;
        }
        state.next_level();
        log::info!("Level {} -> {}", transition.cleared_level, state.level);
    }

    if !state.wave_active {
        let level = state.level;
        let wave = create_wave(level, rng, || state.next_entity_id());
        state.enemies.extend(wave);
        state.wave_active = true;
        state.events.push(GameEvent::WaveStarted { level });
    }
}

/// Schedule the next level once the wave is empty (one-shot per wave)
fn check_wave_clear(state: &mut GameState, now: Millis) {
    if !state.wave_active || !state.enemies.is_empty() || state.wave_transition.is_some() {
        return;
    }
    let level = state.level;
    state.wave_transition = Some(WaveTransition {
        fires_at: now + state.tuning.wave_clear_delay_ms,
        cleared_level: level,
    });
    log::info!("Wave {level} cleared");
    state.events.push(GameEvent::WaveCleared { level });
}

/// Enemies reaching the player's line end the run regardless of lives
fn check_invasion(state: &mut GameState) {
    let line = state.player.pos.y + INVASION_MARGIN;
    if state.enemies.iter().any(|e| e.pos.y <= line) {
        log::info!("Enemies reached the player line");
        state.end_run();
    }
}

/// Demo AI: chase nearby pickups, otherwise line up under the lowest enemy and fire
fn autopilot(state: &GameState) -> TickInput {
    let player = state.player.pos;

    let pickup = state
        .power_ups
        .iter()
        .filter(|p| p.pos.y < player.y + 3.0)
        .min_by(|a, b| {
            (a.pos.x - player.x)
                .abs()
                .partial_cmp(&(b.pos.x - player.x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.pos.x);

    let lowest_enemy = state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x + e.direction * e.speed * 10.0);

    let move_axis = match pickup.or(lowest_enemy) {
        Some(target) => {
            let dx = target - player.x;
            if dx.abs() < 0.05 { 0.0 } else { dx.signum() }
        }
        None => 0.0,
    };

    TickInput {
        move_axis,
        shoot: !state.enemies.is_empty(),
        pause: false,
        idle_mode: true,
    }
}

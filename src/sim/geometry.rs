//! Collision and bounds helpers
//!
//! Gameplay is planar: only x and y take part in overlap and bounds tests.

use std::f32::consts::TAU;

use glam::Vec3;

use super::rng::RandomSource;
use super::state::Particle;
use crate::consts::*;

/// Explosion tint for regular enemies
pub const EXPLOSION_COLOR: u32 = 0xff4444;
/// Brighter tint for boss explosions
pub const BOSS_EXPLOSION_COLOR: u32 = 0xff6666;

/// Circle-circle overlap on the x/y plane
#[inline]
pub fn circles_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    a.truncate().distance(b.truncate()) < radius_a + radius_b
}

/// True if the position has left the arena rectangle
#[inline]
pub fn is_out_of_bounds(pos: Vec3) -> bool {
    pos.x < ARENA_LEFT || pos.x > ARENA_RIGHT || pos.y < ARENA_BOTTOM || pos.y > ARENA_TOP
}

/// Radial burst of `count` particles evenly spaced around `origin`
///
/// Each particle draws speed, life, z-drift and size from `rng`.
pub fn explosion_particles(
    origin: Vec3,
    count: usize,
    color: u32,
    rng: &mut dyn RandomSource,
    mut next_id: impl FnMut() -> u32,
) -> Vec<Particle> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            let speed = 0.05 + rng.next_f32() * 0.1;
            let life = 0.5 + rng.next_f32() * 0.5;
            let drift = (rng.next_f32() - 0.5) * 0.02;
            let size = 0.1 + rng.next_f32() * 0.1;
            Particle {
                id: next_id(),
                pos: origin,
                vel: Vec3::new(angle.cos() * speed, angle.sin() * speed, drift),
                life,
                max_life: life,
                color,
                size,
            }
        })
        .collect()
}

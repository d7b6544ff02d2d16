//! Enemy pattern table and wave generation

use glam::Vec3;

use super::rng::RandomSource;
use super::state::{BossPhase, BossState, Enemy, EnemyKind, EnemyShield};

/// Per-type base stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyPattern {
    pub health: f32,
    /// Horizontal displacement per tick
    pub speed: f32,
    /// Points awarded on destruction
    pub score: u64,
    pub shoot_chance: f32,
}

impl EnemyKind {
    pub fn pattern(self) -> EnemyPattern {
        let (health, speed, score, shoot_chance) = match self {
            EnemyKind::Basic => (20.0, 0.01, 10, 0.002),
            EnemyKind::Fast => (15.0, 0.02, 20, 0.001),
            EnemyKind::Tank => (50.0, 0.005, 50, 0.003),
            EnemyKind::Boss => (200.0, 0.008, 500, 0.005),
            EnemyKind::BossShield => (300.0, 0.01, 800, 0.004),
            EnemyKind::BossRapid => (250.0, 0.012, 700, 0.008),
            EnemyKind::BossTank => (400.0, 0.006, 1000, 0.006),
        };
        EnemyPattern {
            health,
            speed,
            score,
            shoot_chance,
        }
    }
}

/// Every fifth level is a boss level
pub const BOSS_LEVEL_INTERVAL: u32 = 5;
pub const MAX_ROWS: u32 = 5;
pub const MIN_PER_ROW: u32 = 4;
pub const MAX_SUPPORT: u32 = 6;
pub const GRID_SPACING_X: f32 = 1.5;
pub const GRID_SPACING_Y: f32 = 1.2;
pub const GRID_BASE_Y: f32 = 3.0;
pub const BOSS_SPAWN_Y: f32 = 4.0;
pub const SUPPORT_Y: f32 = 2.0;
pub const SUPPORT_SPACING: f32 = 2.0;

pub fn is_boss_level(level: u32) -> bool {
    level.is_multiple_of(BOSS_LEVEL_INTERVAL)
}

/// Rows in a regular (non-boss) wave
pub fn grid_rows(level: u32) -> u32 {
    (2 + level / 3).min(MAX_ROWS)
}

/// Enemies in a given row of a regular wave
pub fn grid_row_len(level: u32, row: u32) -> u32 {
    (8 + level / 2).saturating_sub(row * 2).max(MIN_PER_ROW)
}

/// Fast escorts accompanying a boss
pub fn support_count(level: u32) -> u32 {
    (2 + level / 10).min(MAX_SUPPORT)
}

/// Build the enemy roster for `level` (1-based)
pub fn create_wave(
    level: u32,
    rng: &mut dyn RandomSource,
    mut next_id: impl FnMut() -> u32,
) -> Vec<Enemy> {
    let level = level.max(1);
    let enemies = if is_boss_level(level) {
        boss_wave(level, &mut next_id)
    } else {
        grid_wave(level, rng, &mut next_id)
    };
    log::info!(
        "Wave {}: {} enemies{}",
        level,
        enemies.len(),
        if is_boss_level(level) { " (boss)" } else { "" }
    );
    enemies
}

fn boss_wave(level: u32, next_id: &mut impl FnMut() -> u32) -> Vec<Enemy> {
    let tier = level / BOSS_LEVEL_INTERVAL;
    let kind = EnemyKind::BOSSES[tier as usize % EnemyKind::BOSSES.len()];
    let pattern = kind.pattern();
    let health = pattern.health + tier as f32 * 50.0;
    let shield = (kind == EnemyKind::BossShield).then_some(EnemyShield {
        active: true,
        broke_at: None,
    });

    let mut enemies = vec![Enemy {
        id: next_id(),
        kind,
        pos: Vec3::new(0.0, BOSS_SPAWN_Y, 0.0),
        health,
        max_health: health,
        speed: pattern.speed * (1.0 + level as f32 * 0.05),
        last_shot: 0,
        direction: 1.0,
        boss: Some(BossState {
            phase: BossPhase::One,
            shield,
        }),
    }];

    let count = support_count(level);
    for i in 0..count {
        let x = (i as f32 - (count - 1) as f32 / 2.0) * SUPPORT_SPACING;
        enemies.push(scaled_enemy(
            EnemyKind::Fast,
            level,
            Vec3::new(x, SUPPORT_Y, 0.0),
            next_id(),
        ));
    }
    enemies
}

fn grid_wave(
    level: u32,
    rng: &mut dyn RandomSource,
    next_id: &mut impl FnMut() -> u32,
) -> Vec<Enemy> {
    let mut enemies = Vec::new();
    for row in 0..grid_rows(level) {
        let per_row = grid_row_len(level, row);
        let y = GRID_BASE_Y + row as f32 * GRID_SPACING_Y;
        for col in 0..per_row {
            let x = (col as f32 - (per_row - 1) as f32 / 2.0) * GRID_SPACING_X;
            let kind = roll_grid_kind(level, rng);
            enemies.push(scaled_enemy(kind, level, Vec3::new(x, y, 0.0), next_id()));
        }
    }
    enemies
}

/// Basic by default; fast from level 3, tank from level 5 (tank wins)
fn roll_grid_kind(level: u32, rng: &mut dyn RandomSource) -> EnemyKind {
    let mut kind = EnemyKind::Basic;
    if level >= 3 && rng.next_f32() < 0.3 {
        kind = EnemyKind::Fast;
    }
    if level >= 5 && rng.next_f32() < 0.2 {
        kind = EnemyKind::Tank;
    }
    kind
}

/// Non-boss enemy with level scaling applied
fn scaled_enemy(kind: EnemyKind, level: u32, pos: Vec3, id: u32) -> Enemy {
    let pattern = kind.pattern();
    let health = pattern.health + (level / 3) as f32 * 5.0;
    Enemy {
        id,
        kind,
        pos,
        health,
        max_health: health,
        speed: pattern.speed * (1.0 + level as f32 * 0.1),
        last_shot: 0,
        direction: 1.0,
        boss: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{SequenceRng, SimRng};
    use proptest::prelude::*;

    fn ids() -> impl FnMut() -> u32 {
        let mut next = 0;
        move || {
            next += 1;
            next
        }
    }

    #[test]
    fn test_level_one_is_all_basic() {
        let mut rng = SequenceRng::constant(0.0);
        let wave = create_wave(1, &mut rng, ids());
        // 2 rows: 8 + 6
        assert_eq!(wave.len(), 14);
        assert!(wave.iter().all(|e| e.kind == EnemyKind::Basic));
        assert!(wave.iter().all(|e| e.health == 20.0 && e.boss.is_none()));
        assert!((wave[0].speed - 0.011).abs() < 1e-6);
        assert_eq!(wave[0].pos, Vec3::new(-5.25, 3.0, 0.0));
        assert_eq!(wave[8].pos.y, 3.0 + GRID_SPACING_Y);
    }

    #[test]
    fn test_tank_overrides_fast() {
        // Every draw succeeds: fast roll then tank roll
        let mut rng = SequenceRng::constant(0.1);
        let wave = create_wave(7, &mut rng, ids());
        assert!(wave.iter().all(|e| e.kind == EnemyKind::Tank));
        assert_eq!(wave[0].health, 50.0 + 10.0);
    }

    #[test]
    fn test_fast_from_level_three() {
        let mut rng = SequenceRng::constant(0.25);
        let wave = create_wave(3, &mut rng, ids());
        assert!(wave.iter().all(|e| e.kind == EnemyKind::Fast));
        let mut rng = SequenceRng::constant(0.25);
        let wave = create_wave(2, &mut rng, ids());
        assert!(wave.iter().all(|e| e.kind == EnemyKind::Basic));
    }

    #[test]
    fn test_boss_rotation() {
        let mut rng = SequenceRng::constant(0.0);
        let kinds: Vec<EnemyKind> = [5, 10, 15, 20, 25]
            .iter()
            .map(|&level| create_wave(level, &mut rng, ids())[0].kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EnemyKind::BossShield,
                EnemyKind::BossRapid,
                EnemyKind::BossTank,
                EnemyKind::Boss,
                EnemyKind::BossShield,
            ]
        );
    }

    #[test]
    fn test_boss_stats() {
        let mut rng = SequenceRng::constant(0.0);
        let wave = create_wave(5, &mut rng, ids());
        let boss = &wave[0];
        assert_eq!(boss.kind, EnemyKind::BossShield);
        assert_eq!(boss.max_health, 350.0);
        assert!((boss.speed - 0.01 * 1.25).abs() < 1e-6);
        assert_eq!(boss.boss_phase(), Some(BossPhase::One));
        assert!(boss.shield_active());

        let wave = create_wave(10, &mut rng, ids());
        assert_eq!(wave[0].kind, EnemyKind::BossRapid);
        assert!(!wave[0].shield_active());
        assert!(wave[0].boss.unwrap().shield.is_none());
        // Support squad centred on x = 0
        let xs: Vec<f32> = wave[1..].iter().map(|e| e.pos.x).collect();
        assert_eq!(xs, vec![-2.0, 0.0, 2.0]);
        assert!(wave[1..].iter().all(|e| e.health == 15.0 + 15.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = SimRng::seeded(7);
        let mut wave = create_wave(12, &mut rng, ids());
        let len = wave.len();
        wave.sort_by_key(|e| e.id);
        wave.dedup_by_key(|e| e.id);
        assert_eq!(wave.len(), len);
    }

    #[test]
    fn test_extreme_level_does_not_overflow() {
        let mut rng = SequenceRng::constant(0.0);
        // u32::MAX is a multiple of five
        let wave = create_wave(u32::MAX, &mut rng, ids());
        let boss = &wave[0];
        assert!(boss.kind.is_boss());
        assert!(boss.max_health.is_finite());
        assert!(boss.max_health > 1.0e9);
        assert_eq!(wave.len(), 1 + MAX_SUPPORT as usize);
        assert!(wave.iter().all(|e| e.health.is_finite() && e.health > 0.0));
    }

    proptest! {
        #[test]
        fn prop_boss_levels(tier in 1u32..60, seed in any::<u64>()) {
            let level = tier * 5;
            let mut rng = SimRng::seeded(seed);
            let wave = create_wave(level, &mut rng, ids());
            let bosses = wave.iter().filter(|e| e.kind.is_boss()).count();
            let fast = wave.iter().filter(|e| e.kind == EnemyKind::Fast).count() as u32;
            prop_assert_eq!(bosses, 1);
            prop_assert_eq!(fast, (2 + level / 10).min(6));
            prop_assert_eq!(wave.len() as u32, 1 + fast);
        }

        #[test]
        fn prop_grid_levels(level in 1u32..300, seed in any::<u64>()) {
            prop_assume!(level % 5 != 0);
            let mut rng = SimRng::seeded(seed);
            let wave = create_wave(level, &mut rng, ids());
            let rows = (2 + level / 3).min(5);
            let mut ys: Vec<f32> = wave.iter().map(|e| e.pos.y).collect();
            ys.dedup();
            prop_assert_eq!(ys.len() as u32, rows);
            let first_row = wave.iter().filter(|e| e.pos.y == GRID_BASE_Y).count() as u32;
            prop_assert_eq!(first_row, (8 + level / 2).max(4));
            prop_assert!(wave.iter().all(|e| !e.kind.is_boss()));
            prop_assert!(wave.iter().all(|e| e.health > 0.0 && e.health == e.max_health));
        }
    }
}

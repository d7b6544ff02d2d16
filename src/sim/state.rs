//! Game state and core simulation types
//!
//! `GameState` is the authoritative run state. Renderers read it; all
//! mutation goes through the methods here or the tick pipeline.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no run in progress
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run suspended, nothing advances
    Paused,
    /// Run ended
    GameOver,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Boss,
    BossShield,
    BossRapid,
    BossTank,
}

impl EnemyKind {
    /// Boss rotation used on every fifth level
    pub const BOSSES: [EnemyKind; 4] = [
        EnemyKind::Boss,
        EnemyKind::BossShield,
        EnemyKind::BossRapid,
        EnemyKind::BossTank,
    ];

    pub fn is_boss(self) -> bool {
        matches!(
            self,
            EnemyKind::Boss | EnemyKind::BossShield | EnemyKind::BossRapid | EnemyKind::BossTank
        )
    }
}

/// Boss aggression tier, keyed to remaining health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    pub fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }
}

/// Damage-reduction shield carried by `BossShield`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyShield {
    pub active: bool,
    /// When the shield last dropped (`None` = never broken)
    pub broke_at: Option<Millis>,
}

/// Extra state present only on boss-family enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub phase: BossPhase,
    /// Only `BossShield` carries a shield
    pub shield: Option<EnemyShield>,
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec3,
    pub health: f32,
    pub max_health: f32,
    /// Horizontal displacement per tick
    pub speed: f32,
    pub last_shot: Millis,
    /// -1.0 (left) or +1.0 (right)
    pub direction: f32,
    pub boss: Option<BossState>,
}

impl Enemy {
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }

    pub fn shield_active(&self) -> bool {
        self.boss.and_then(|b| b.shield).is_some_and(|s| s.active)
    }

    pub fn boss_phase(&self) -> Option<BossPhase> {
        self.boss.map(|b| b.phase)
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec3,
    /// Displacement per tick
    pub vel: Vec3,
    pub owner: BulletOwner,
    pub damage: f32,
}

impl Bullet {
    pub fn is_player(&self) -> bool {
        self.owner == BulletOwner::Player
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    Bomb,
    MultiShot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::Bomb,
        PowerUpKind::MultiShot,
    ];
}

/// A dropped power-up drifting toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec3,
    pub vel: Vec3,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

/// The player's ship and vitals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub weapon_level: u32,
    /// Last successful shot (`None` = not fired this run)
    pub last_shot: Option<Millis>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, PLAYER_START_Y, 0.0),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            shield: 0.0,
            weapon_level: 1,
            last_shot: None,
        }
    }
}

impl Player {
    /// Damage per bullet at the current weapon level
    pub fn bullet_damage(&self) -> f32 {
        PLAYER_BULLET_BASE_DAMAGE + self.weapon_level as f32 * PLAYER_BULLET_DAMAGE_PER_LEVEL
    }
}

/// Timed power-up effects, stored as expiry timestamps.
/// `laser_until` and `time_slow_until` are carried for hosts; no pickup sets them yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub rapid_fire_until: Millis,
    pub multi_shot_until: Millis,
    pub laser_until: Millis,
    pub time_slow_until: Millis,
}

impl ActiveEffects {
    pub fn rapid_fire(&self, now: Millis) -> bool {
        self.rapid_fire_until > now
    }

    pub fn multi_shot(&self, now: Millis) -> bool {
        self.multi_shot_until > now
    }
}

/// Pending level advance after a wave clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveTransition {
    pub fires_at: Millis,
    /// Level that was cleared
    pub cleared_level: u32,
}

/// Final numbers reported at game over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub enemies_defeated: u32,
}

/// Notifications for audio and other observers, drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaveStarted { level: u32 },
    WaveCleared { level: u32 },
    EnemyHit { id: u32, kind: EnemyKind },
    EnemyDestroyed {
        id: u32,
        kind: EnemyKind,
        score: u64,
    },
    BossPhaseChanged { id: u32, phase: BossPhase },
    BossShieldBroken { id: u32 },
    PlayerHit { damage: f32 },
    LifeLost { lives_left: u32 },
    PowerUpCollected { kind: PowerUpKind },
    GameOver { summary: RunSummary },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    /// Best score seen so far (never decreases)
    pub high_score: u64,
    pub enemies_defeated: u32,
    pub player: Player,
    pub effects: ActiveEffects,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    /// Whether the current level's wave has been spawned
    pub wave_active: bool,
    pub wave_transition: Option<WaveTransition>,
    pub tuning: Tuning,
    /// Events raised since the last drain. Only `Session::drain_events` and
    /// run resets empty this; hosts calling `tick` directly must drain it.
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Create a session sitting at the menu
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            lives: tuning.starting_lives,
            high_score: 0,
            enemies_defeated: 0,
            player: Player::default(),
            effects: ActiveEffects::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            wave_active: false,
            wave_transition: None,
            tuning,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset every run-scoped field. Keeps high score, tuning and the ID counter.
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lives = self.tuning.starting_lives;
        self.enemies_defeated = 0;
        self.player = Player::default();
        self.effects = ActiveEffects::default();
        self.enemies.clear();
        self.bullets.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.wave_active = false;
        self.wave_transition = None;
        self.events.clear();
    }

    /// Begin a fresh run from any phase
    pub fn start(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run started");
    }

    /// Playing -> Paused. Returns false if not playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    /// Paused -> Playing. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// End the run and fold the score into the high score.
    /// Returns false if the run was already over.
    pub fn end_run(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.high_score = self.high_score.max(self.score);
        self.phase = GamePhase::GameOver;
        self.wave_transition = None;
        let summary = self.summary();
        log::info!(
            "Game over: score={} level={} defeated={}",
            summary.score,
            summary.level,
            summary.enemies_defeated
        );
        self.events.push(GameEvent::GameOver { summary });
        true
    }

    /// GameOver -> Menu, clearing the finished run
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.reset_run();
        self.phase = GamePhase::Menu;
        true
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.level,
            enemies_defeated: self.enemies_defeated,
        }
    }

    // === Player ===

    /// Move horizontally, clamped to the play area
    pub fn move_player(&mut self, dx: f32) {
        if !dx.is_finite() {
            return;
        }
        self.player.pos.x = (self.player.pos.x + dx).clamp(-PLAYER_X_LIMIT, PLAYER_X_LIMIT);
    }

    pub fn set_player_position(&mut self, pos: Vec3) {
        if !pos.is_finite() {
            return;
        }
        self.player.pos = pos;
        self.player.pos.x = pos.x.clamp(-PLAYER_X_LIMIT, PLAYER_X_LIMIT);
    }

    /// Fire if the cooldown allows it. Returns the number of bullets spawned.
    pub fn player_shoot(&mut self, now: Millis) -> usize {
        if self.phase != GamePhase::Playing {
            return 0;
        }
        let interval = self.tuning.fire_interval(self.effects.rapid_fire(now));
        if let Some(last) = self.player.last_shot {
            if now.saturating_sub(last) < interval {
                return 0;
            }
        }

        let multi =
            self.effects.multi_shot(now) || self.player.weapon_level >= MULTI_SHOT_WEAPON_LEVEL;
        let offsets: &[f32] = if multi {
            &[-MULTI_SHOT_SPREAD, 0.0, MULTI_SHOT_SPREAD]
        } else {
            &[0.0]
        };

        let damage = self.player.bullet_damage();
        let origin = self.player.pos;
        for &dx in offsets {
            let id = self.next_entity_id();
            self.bullets.push(Bullet {
                id,
                pos: Vec3::new(origin.x + dx, origin.y + 0.5, origin.z),
                vel: Vec3::new(0.0, PLAYER_BULLET_SPEED, 0.0),
                owner: BulletOwner::Player,
                damage,
            });
        }
        self.player.last_shot = Some(now);
        offsets.len()
    }

    /// Shield absorbs first, the rest comes off health (floored at 0)
    pub fn take_damage(&mut self, amount: f32) {
        let damage = sanitize(amount);
        let absorbed = damage.min(self.player.shield);
        self.player.shield -= absorbed;
        self.player.health = (self.player.health - (damage - absorbed)).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.player.health = (self.player.health + sanitize(amount)).min(self.player.max_health);
    }

    pub fn add_shield(&mut self, amount: f32) {
        self.player.shield = (self.player.shield + sanitize(amount)).min(PLAYER_MAX_SHIELD);
    }

    // === Entity collections ===

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Remove by ID; a missing ID is a no-op
    pub fn remove_enemy(&mut self, id: u32) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn remove_bullet(&mut self, id: u32) -> Option<Bullet> {
        let idx = self.bullets.iter().position(|b| b.id == id)?;
        Some(self.bullets.remove(idx))
    }

    pub fn add_power_up(&mut self, power_up: PowerUp) {
        self.power_ups.push(power_up);
    }

    pub fn remove_power_up(&mut self, id: u32) -> Option<PowerUp> {
        let idx = self.power_ups.iter().position(|p| p.id == id)?;
        Some(self.power_ups.remove(idx))
    }

    pub fn add_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Pick up a power-up by ID, apply it and award the flat bonus
    pub fn collect_power_up(&mut self, id: u32, now: Millis) -> Option<PowerUpKind> {
        let power_up = self.remove_power_up(id)?;
        self.apply_power_up(power_up.kind, now);
        self.score += self.tuning.power_up_bonus;
        self.events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
        Some(power_up.kind)
    }

    fn apply_power_up(&mut self, kind: PowerUpKind, now: Millis) {
        match kind {
            PowerUpKind::RapidFire => {
                self.effects.rapid_fire_until = now + self.tuning.rapid_fire_duration_ms;
            }
            PowerUpKind::Shield => self.add_shield(self.tuning.shield_pickup_amount),
            PowerUpKind::Bomb => {
                self.enemies.clear();
                self.bullets.retain(Bullet::is_player);
            }
            PowerUpKind::MultiShot => {
                self.effects.multi_shot_until = now + self.tuning.multi_shot_duration_ms;
            }
        }
    }

    // === Score and progression ===

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Advance one level: enemies and power-ups go, player bullets stay
    pub fn next_level(&mut self) {
        self.level += 1;
        self.enemies.clear();
        self.power_ups.clear();
        self.bullets.retain(Bullet::is_player);
        self.wave_active = false;
        self.wave_transition = None;
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    /// Lose a life; the run ends when none remain
    pub fn remove_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.end_run();
        }
    }
}

/// Negative and non-finite amounts count as zero
fn sanitize(amount: f32) -> f32 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}

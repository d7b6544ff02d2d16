//! Space Defender - A wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, combat, waves, session state)
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Local best-score cache
//! - `highscores`: Leaderboard storage
//! - `audio`: Sound notification bridge
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::{HighscoreStore, MemoryStore, NewHighscore};
pub use sim::{GamePhase, GameState, Session, TickInput};
pub use tuning::Tuning;

/// Wall-clock timestamp in milliseconds
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    /// Arena bounds (world units)
    pub const ARENA_LEFT: f32 = -8.0;
    pub const ARENA_RIGHT: f32 = 8.0;
    pub const ARENA_TOP: f32 = 6.0;
    pub const ARENA_BOTTOM: f32 = -6.0;

    /// Player ship limits
    pub const PLAYER_X_LIMIT: f32 = 7.0;
    pub const PLAYER_START_Y: f32 = -4.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_SHIELD: f32 = 100.0;

    /// Collision radii
    pub const BULLET_RADIUS: f32 = 0.1;
    pub const ENEMY_RADIUS: f32 = 0.3;
    pub const PLAYER_RADIUS: f32 = 0.3;
    pub const POWER_UP_RADIUS: f32 = 0.2;

    /// Player bullets
    pub const PLAYER_BULLET_SPEED: f32 = 0.3;
    pub const PLAYER_BULLET_BASE_DAMAGE: f32 = 20.0;
    pub const PLAYER_BULLET_DAMAGE_PER_LEVEL: f32 = 5.0;
    pub const MULTI_SHOT_SPREAD: f32 = 0.3;
    /// Weapon level at which multi-shot becomes permanent
    pub const MULTI_SHOT_WEAPON_LEVEL: u32 = 3;

    /// Enemy formation
    pub const ENEMY_DESCENT: f32 = 0.3;
    /// Enemies this close above the player end the run
    pub const INVASION_MARGIN: f32 = 0.5;
}

//! Simulation module
//!
//! All gameplay logic lives here:
//! - Frame-driven: one `tick` per rendered frame, never reentrant
//! - All random draws go through `RandomSource`
//! - No rendering, audio or platform dependencies

pub mod combat;
pub mod geometry;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod update;
pub mod wave;

pub use geometry::{circles_overlap, explosion_particles, is_out_of_bounds};
pub use rng::{RandomSource, SequenceRng, SimRng};
pub use session::Session;
pub use state::{
    ActiveEffects, BossPhase, BossState, Bullet, BulletOwner, Enemy, EnemyKind, EnemyShield,
    GameEvent, GamePhase, GameState, Particle, Player, PowerUp, PowerUpKind, RunSummary,
    WaveTransition,
};
pub use tick::{TickInput, tick};
pub use wave::{EnemyPattern, create_wave};

//! Data-driven game balance
//!
//! Defaults reproduce the stock game. Any subset of fields can be overridden
//! from a JSON file; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Millis;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value out of range: {0}")]
    OutOfRange(&'static str),
}

/// Balance values for timers, probabilities and player handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Minimum time between player shots
    pub fire_interval_ms: Millis,
    /// Minimum time between player shots while rapid fire is active
    pub rapid_fire_interval_ms: Millis,
    pub rapid_fire_duration_ms: Millis,
    pub multi_shot_duration_ms: Millis,
    /// Shield granted by a shield pickup
    pub shield_pickup_amount: f32,
    /// Flat score for collecting any power-up
    pub power_up_bonus: u64,
    /// Chance a destroyed enemy drops a power-up
    pub drop_chance: f32,
    /// Delay between clearing a wave and the next level
    pub wave_clear_delay_ms: Millis,
    /// Time a broken boss shield stays down before it may regenerate
    pub shield_regen_cooldown_ms: Millis,
    /// Chance each hit on an active boss shield breaks it
    pub shield_break_chance: f32,
    /// Fraction of bullet damage that passes through an active boss shield
    pub shield_damage_factor: f32,
    /// Horizontal player speed (units per second of held input)
    pub player_move_speed: f32,
    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fire_interval_ms: 200,
            rapid_fire_interval_ms: 100,
            rapid_fire_duration_ms: 10_000,
            multi_shot_duration_ms: 15_000,
            shield_pickup_amount: 50.0,
            power_up_bonus: 100,
            drop_chance: 0.15,
            wave_clear_delay_ms: 2_000,
            shield_regen_cooldown_ms: 5_000,
            shield_break_chance: 0.3,
            shield_damage_factor: 0.2,
            player_move_speed: 8.0,
            starting_lives: 3,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Probabilities and factors must lie in [0, 1], amounts must be
    /// non-negative and a run needs at least one life.
    pub fn validate(&self) -> Result<(), TuningError> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !unit(self.drop_chance) {
            return Err(TuningError::OutOfRange("drop_chance"));
        }
        if !unit(self.shield_break_chance) {
            return Err(TuningError::OutOfRange("shield_break_chance"));
        }
        if !unit(self.shield_damage_factor) {
            return Err(TuningError::OutOfRange("shield_damage_factor"));
        }
        if !non_negative(self.shield_pickup_amount) {
            return Err(TuningError::OutOfRange("shield_pickup_amount"));
        }
        if !non_negative(self.player_move_speed) {
            return Err(TuningError::OutOfRange("player_move_speed"));
        }
        if self.starting_lives == 0 {
            return Err(TuningError::OutOfRange("starting_lives"));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load overrides if the file exists, otherwise (or on error) use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Shot cooldown given whether rapid fire is active
    pub fn fire_interval(&self, rapid_fire: bool) -> Millis {
        if rapid_fire {
            self.rapid_fire_interval_ms
        } else {
            self.fire_interval_ms
        }
    }
}

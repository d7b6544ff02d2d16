//! Session ownership: game state plus its random source and score cache
//!
//! `Session` is the single entry point for hosts. It owns the run state,
//! forwards input to the state machine, drives ticks and writes the best
//! score to the local cache whenever a run ends.

use glam::Vec3;

use super::rng::{RandomSource, SimRng};
use super::state::{GameEvent, GamePhase, GameState, RunSummary};
use super::tick::{TickInput, tick};
use crate::Millis;
use crate::persistence::{MemoryCache, ScoreCache};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    rng: Box<dyn RandomSource>,
    cache: Box<dyn ScoreCache>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(
            Tuning::default(),
            Box::new(SimRng::from_entropy()),
            Box::new(MemoryCache::default()),
        )
    }
}

impl Session {
    /// Create a session at the menu, seeding the high score from `cache`
    ///
    /// Out-of-range tuning is replaced by the defaults.
    pub fn new(tuning: Tuning, rng: Box<dyn RandomSource>, cache: Box<dyn ScoreCache>) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejecting tuning, using defaults: {e}");
                Tuning::default()
            }
        };
        let mut state = GameState::new(tuning);
        state.high_score = match cache.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Could not load high score, starting from 0: {e}");
                0
            }
        };
        Self { state, rng, cache }
    }

    /// Read-only view for renderers and HUDs
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn summary(&self) -> RunSummary {
        self.state.summary()
    }

    pub fn start_game(&mut self) {
        self.state.start();
    }

    /// Start over from any phase
    pub fn restart_game(&mut self) {
        self.state.start();
    }

    pub fn return_to_menu(&mut self) -> bool {
        self.state.return_to_menu()
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    /// End the run now and persist the best score
    pub fn game_over(&mut self) {
        if self.state.end_run() {
            self.persist_high_score();
        }
    }

    pub fn move_player(&mut self, dx: f32) {
        if self.state.phase == GamePhase::Playing {
            self.state.move_player(dx);
        }
    }

    pub fn set_player_position(&mut self, pos: Vec3) {
        self.state.set_player_position(pos);
    }

    /// Returns the number of bullets fired (0 while cooling down)
    pub fn shoot(&mut self, now: Millis) -> usize {
        self.state.player_shoot(now)
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput, dt: f32, now: Millis) {
        let was_over = self.state.phase == GamePhase::GameOver;
        tick(&mut self.state, self.rng.as_mut(), input, dt, now);
        if !was_over && self.state.phase == GamePhase::GameOver {
            self.persist_high_score();
        }
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    fn persist_high_score(&mut self) {
        match self.cache.store(self.state.high_score) {
            Ok(()) => log::info!("High score saved ({})", self.state.high_score),
            Err(e) => log::warn!("Failed to save high score: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistenceError;
    use crate::sim::rng::SequenceRng;
    use crate::sim::state::{Enemy, EnemyKind};
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    /// Cache that records writes and can be told to fail
    #[derive(Clone, Default)]
    struct SpyCache {
        stored: Rc<Cell<Option<u64>>>,
        fail: bool,
    }

    impl ScoreCache for SpyCache {
        fn load(&self) -> Result<u64, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("spy"));
            }
            Ok(self.stored.get().unwrap_or(0))
        }

        fn store(&mut self, score: u64) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("spy"));
            }
            self.stored.set(Some(score));
            Ok(())
        }
    }

    fn session_with(cache: SpyCache) -> Session {
        Session::new(
            Tuning::default(),
            Box::new(SequenceRng::constant(0.99)),
            Box::new(cache),
        )
    }

    #[test]
    fn test_loads_high_score() {
        let cache = SpyCache::default();
        cache.stored.set(Some(4_200));
        let session = session_with(cache);
        assert_eq!(session.state().high_score, 4_200);
        assert_eq!(session.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_invalid_tuning_replaced() {
        let tuning = Tuning {
            shield_damage_factor: -1.0,
            ..Default::default()
        };
        let session = Session::new(
            tuning,
            Box::new(SequenceRng::constant(0.99)),
            Box::new(SpyCache::default()),
        );
        assert_eq!(session.state().tuning, Tuning::default());
    }

    #[test]
    fn test_game_over_persists_best() {
        let cache = SpyCache::default();
        let stored = cache.stored.clone();
        let mut session = session_with(cache);
        session.start_game();
        session.state.add_score(250);
        session.game_over();
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(stored.get(), Some(250));

        session.restart_game();
        session.state.add_score(100);
        session.game_over();
        assert_eq!(stored.get(), Some(250));
        assert_eq!(session.state().high_score, 250);
    }

    #[test]
    fn test_storage_failure_does_not_interrupt() {
        let cache = SpyCache {
            fail: true,
            ..Default::default()
        };
        let mut session = session_with(cache);
        assert_eq!(session.state().high_score, 0);
        session.start_game();
        session.state.add_score(90);
        session.game_over();
        assert_eq!(session.state().high_score, 90);
        session.restart_game();
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_invasion_in_tick_persists() {
        let cache = SpyCache::default();
        let stored = cache.stored.clone();
        let mut session = session_with(cache);
        session.start_game();
        session.tick(&TickInput::default(), DT, 1_000);
        session.state.add_score(40);
        session.state.enemies[0].pos = Vec3::new(0.0, -3.6, 0.0);
        session.tick(&TickInput::default(), DT, 1_016);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(stored.get(), Some(40));
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { summary } if summary.score == 40 && summary.level == 1
        )));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_restart_discards_pending_transition() {
        let mut session = session_with(SpyCache::default());
        session.start_game();
        session.tick(&TickInput::default(), DT, 1_000);
        session.state.enemies.clear();
        session.tick(&TickInput::default(), DT, 1_016);
        assert!(session.state().wave_transition.is_some());

        session.restart_game();
        assert!(session.state().wave_transition.is_none());
        // Well past the old deadline: the restarted run stays on level 1
        session.tick(&TickInput::default(), DT, 10_000);
        assert_eq!(session.state().level, 1);
        assert_eq!(session.state().enemies.len(), 14);
    }

    #[test]
    fn test_full_wave_by_shooting() {
        let mut session = session_with(SpyCache::default());
        session.start_game();
        session.tick(&TickInput::default(), DT, 1_000);

        // Replace the wave with one tank and one fast enemy above the player
        session.state.enemies.clear();
        for (kind, x) in [(EnemyKind::Tank, -2.0), (EnemyKind::Fast, 2.0)] {
            let id = session.state.next_entity_id();
            let pattern = kind.pattern();
            session.state.add_enemy(Enemy {
                id,
                kind,
                pos: Vec3::new(x, 0.0, 0.0),
                health: pattern.health,
                max_health: pattern.health,
                speed: 0.0,
                last_shot: 0,
                direction: 1.0,
                boss: None,
            });
        }
        session.state.player.weapon_level = 6;

        let mut now = 1_016;
        for x in [-2.0f32, 2.0] {
            session.set_player_position(Vec3::new(x, -4.0, 0.0));
            session.shoot(now);
            for _ in 0..30 {
                now += 16;
                session.tick(&TickInput::default(), DT, now);
            }
        }
        assert!(session.state().enemies.is_empty());
        assert_eq!(session.state().score, 70);
        assert_eq!(session.state().level, 1);

        for _ in 0..200 {
            now += 16;
            session.tick(&TickInput::default(), DT, now);
        }
        assert_eq!(session.state().level, 2);
    }
}

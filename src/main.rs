//! Space Defender entry point
//!
//! Natively this runs a headless autopilot game on simulated time, then
//! records the result on the local leaderboard. Usage:
//!
//! ```text
//! space-defender [--seed N] [--frames N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;
    use space_defender::audio::{AudioDispatcher, LogSink};
    use space_defender::highscores::{HighscoreStore, JsonFileStore};
    use space_defender::persistence::FileCache;
    use space_defender::platform;
    use space_defender::sim::{GamePhase, Session, SimRng, TickInput};
    use space_defender::{Millis, NewHighscore, Tuning};

    const TUNING_PATH: &str = "tuning.json";
    const HIGH_SCORE_PATH: &str = "highscore.txt";
    const LEADERBOARD_PATH: &str = "highscores.json";
    const PLAYER_NAME: &str = "autopilot";
    const TOP_SHOWN: usize = 5;

    /// Simulated frame length
    const FRAME_DT: f32 = 1.0 / 60.0;
    const FRAME_MS: Millis = 16;

    #[derive(Parser, Debug)]
    #[command(name = "space-defender")]
    #[command(about = "Play a headless autopilot run and record it on the leaderboard")]
    pub struct Args {
        /// RNG seed for a reproducible run (random if omitted)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Frame limit before the run is ended (default: ten simulated minutes)
        #[arg(long, default_value_t = 60 * 60 * 10)]
        pub frames: u32,
    }

    pub fn run(args: Args) {
        let rng = match args.seed {
            Some(seed) => SimRng::seeded(seed),
            None => SimRng::from_entropy(),
        };

        let tuning = Tuning::load_or_default(TUNING_PATH);
        let mut session = Session::new(
            tuning,
            Box::new(rng),
            Box::new(FileCache::new(HIGH_SCORE_PATH)),
        );
        let mut audio = AudioDispatcher::new(LogSink::default());

        session.start_game();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let start = platform::now_ms();
        let mut frames = 0;
        while frames < args.frames && session.phase() == GamePhase::Playing {
            frames += 1;
            let now = start + Millis::from(frames) * FRAME_MS;
            session.tick(&input, FRAME_DT, now);
            audio.dispatch(&session.drain_events());
        }

        if session.phase() == GamePhase::Playing {
            log::info!("Frame limit reached, ending run");
            session.game_over();
        }

        let summary = session.summary();
        println!(
            "Run over after {frames} frames: score {}, wave {}, {} enemies defeated ({} sounds)",
            summary.score,
            summary.level,
            summary.enemies_defeated,
            audio.sink().played()
        );
        println!("Best score: {}", session.state().high_score);

        let mut board = JsonFileStore::new(LEADERBOARD_PATH);
        if let Err(e) = board.add(
            NewHighscore::from_run(PLAYER_NAME, &summary),
            platform::now_ms(),
        ) {
            log::error!("Failed to record highscore: {e}");
        }

        match board.top(TOP_SHOWN) {
            Ok(top) => {
                println!("Top scores:");
                for (rank, record) in top.iter().enumerate() {
                    println!(
                        "{:>2}. {:<16} {:>8}  wave {}",
                        rank + 1,
                        record.player_name,
                        record.score,
                        record.wave
                    );
                }
            }
            Err(e) => log::error!("Failed to read leaderboard: {e}"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["space-defender"]).unwrap();
            assert_eq!(args.seed, None);
            assert_eq!(args.frames, 36_000);
        }

        #[test]
        fn test_args_seed_and_frames() {
            let argv = ["space-defender", "--seed", "42", "--frames", "600"];
            let args = Args::try_parse_from(argv).unwrap();
            assert_eq!(args.seed, Some(42));
            assert_eq!(args.frames, 600);
        }

        #[test]
        fn test_args_reject_bad_seed() {
            let argv = ["space-defender", "--seed", "soon"];
            assert!(Args::try_parse_from(argv).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    log::info!("Space Defender (headless) starting...");
    headless::run(args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library; there is no standalone entry point
}

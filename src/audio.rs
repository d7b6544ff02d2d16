//! Sound notification bridge
//!
//! The simulation never plays audio itself. It raises `GameEvent`s and the
//! dispatcher maps the interesting ones to a `SoundEffect` for a `SoundSink`.
//! On the web the sink synthesizes tones with the Web Audio API, so no
//! external sound files are needed.

use thiserror::Error;

use crate::sim::GameEvent;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Something took damage
    Hit,
    /// Power-up collected
    Success,
}

impl SoundEffect {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::EnemyHit { .. }
            | GameEvent::EnemyDestroyed { .. }
            | GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::Success),
            _ => None,
        }
    }
}

/// Audio output backend
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    played: usize,
}

impl LogSink {
    pub fn played(&self) -> usize {
        self.played
    }
}

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        self.played += 1;
        log::trace!("sound {effect:?} at volume {volume:.2}");
        Ok(())
    }
}

/// Routes simulation events to a sink with volume and mute applied
pub struct AudioDispatcher<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = clamp_volume(vol);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = clamp_volume(vol);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sounds for a batch of events, returning how many were played.
    ///
    /// Sink failures are logged and skipped; audio never stops the game.
    pub fn dispatch(&mut self, events: &[GameEvent]) -> usize {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return 0;
        }

        let mut played = 0;
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            match self.sink.play(effect, vol) {
                Ok(()) => played += 1,
                Err(e) => log::warn!("Failed to play {effect:?}: {e}"),
            }
        }
        played
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_finite() {
        vol.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, SoundEffect, SoundSink};

    /// Procedural tones through the Web Audio API
    pub struct WebAudioSink {
        ctx: AudioContext,
    }

    impl WebAudioSink {
        /// May fail outside a secure context
        pub fn new() -> Result<Self, AudioError> {
            let ctx = AudioContext::new().map_err(|_| AudioError::Unavailable)?;
            Ok(Self { ctx })
        }

        fn create_osc(
            &self,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let fail = |_| AudioError::Playback("failed to build oscillator".into());
            let osc = self.ctx.create_oscillator().map_err(fail)?;
            let gain = self.ctx.create_gain().map_err(fail)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(fail)?;
            gain.connect_with_audio_node(&self.ctx.destination())
                .map_err(fail)?;
            Ok((osc, gain))
        }

        /// Short triangle tap
        fn play_hit(&self, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = self.create_osc(300.0, OscillatorType::Triangle)?;
            let t = self.ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
            Ok(())
        }

        /// Rising three-note chime
        fn play_success(&self, vol: f32) -> Result<(), AudioError> {
            for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                let (osc, gain) = self.create_osc(*freq, OscillatorType::Sine)?;
                let t = self.ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
            Ok(())
        }
    }

    impl SoundSink for WebAudioSink {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            // Browsers keep the context suspended until a user gesture
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
            match effect {
                SoundEffect::Hit => self.play_hit(volume),
                SoundEffect::Success => self.play_success(volume),
            }
        }
    }
}

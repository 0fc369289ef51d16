//! Audio cues using the Web Audio API
//!
//! Procedurally generated beeps - no external files needed. Every voice is
//! scheduled to stop itself, so playback is fire-and-forget.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session started
    Start,
    /// Emergency-stop signal (880 Hz square beep)
    StopSignal,
    /// A maneuver was passed
    ManeuverPassed,
    /// Attempt failed
    Fail,
    /// Whole course passed
    Pass,
}

impl SoundEffect {
    /// Cue for a session event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        use crate::sim::Maneuver;

        match event {
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::ManeuverStarted(Maneuver::EmergencyStop) => Some(SoundEffect::StopSignal),
            GameEvent::ManeuverStarted(_) => None,
            GameEvent::ManeuverPassed(_) => Some(SoundEffect::ManeuverPassed),
            GameEvent::Failed(_) => Some(SoundEffect::Fail),
            GameEvent::Passed => Some(SoundEffect::Pass),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    struct Tone {
        notes: &'static [f32],
        wave: OscillatorType,
        /// Seconds between note onsets
        spacing: f64,
        /// Seconds each note rings
        length: f64,
        level: f32,
    }

    /// Two-note ding for a passed maneuver
    const DING: Tone = Tone {
        notes: &[660.0, 990.0],
        wave: OscillatorType::Sine,
        spacing: 0.08,
        length: 0.2,
        level: 0.25,
    };

    /// Descending buzz on failure
    const BUZZ: Tone = Tone {
        notes: &[400.0, 300.0, 200.0],
        wave: OscillatorType::Sawtooth,
        spacing: 0.18,
        length: 0.3,
        level: 0.15,
    };

    /// Rising arpeggio when the whole course is passed
    const FANFARE: Tone = Tone {
        notes: &[500.0, 600.0, 750.0, 1000.0],
        wave: OscillatorType::Triangle,
        spacing: 0.1,
        length: 0.4,
        level: 0.3,
    };

    /// Audio manager for the simulator
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 1.0,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set combined effect volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Start => self.play_start(ctx, vol),
                SoundEffect::StopSignal => self.play_stop_signal(ctx, vol),
                SoundEffect::ManeuverPassed => self.play_notes(ctx, vol, DING),
                SoundEffect::Fail => self.play_notes(ctx, vol, BUZZ),
                SoundEffect::Pass => self.play_notes(ctx, vol, FANFARE),
            }
        }

        // === Sound generators ===

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Flat square beep, 0.2 s
        fn play_stop_signal(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.06 * vol, t).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Short rising chirp
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Evenly spaced notes, each decaying over `tone.length` seconds
        fn play_notes(&self, ctx: &AudioContext, vol: f32, tone: Tone) {
            let start = ctx.current_time();
            for (i, &freq) in tone.notes.iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, tone.wave) else {
                    continue;
                };
                let t = start + i as f64 * tone.spacing;
                let level = gain.gain();
                level.set_value_at_time(vol * tone.level, t).ok();
                level.exponential_ramp_to_value_at_time(0.01, t + tone.length).ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + tone.length + 0.05).ok();
            }
        }
    }
}

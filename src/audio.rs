//! Web Audio sound cues
//!
//! Each cue is a short list of synthesized voices, so no audio files are
//! fetched. A missing or blocked `AudioContext` means silence, never an error.

use web_sys::{AudioContext, OscillatorType};

use crate::platform::{SoundCue, SoundSink};

/// One oscillator with an exponential pitch sweep and decay
#[derive(Debug, Clone, Copy)]
struct Voice {
    wave: OscillatorType,
    /// Start and end frequency in Hz
    sweep: (f32, f32),
    /// Peak gain relative to the master volume
    level: f32,
    /// Offset from "now" in seconds
    delay: f64,
    /// Decay time, then the oscillator is cut shortly after
    length: f64,
}

const POINT: [Voice; 2] = [
    Voice {
        wave: OscillatorType::Sine,
        sweep: (660.0, 660.0),
        level: 0.25,
        delay: 0.0,
        length: 0.12,
    },
    Voice {
        wave: OscillatorType::Sine,
        sweep: (880.0, 880.0),
        level: 0.25,
        delay: 0.07,
        length: 0.12,
    },
];

const HIT: [Voice; 1] = [Voice {
    wave: OscillatorType::Square,
    sweep: (180.0, 50.0),
    level: 0.4,
    delay: 0.0,
    length: 0.15,
}];

const DIE: [Voice; 1] = [Voice {
    wave: OscillatorType::Sawtooth,
    sweep: (400.0, 80.0),
    level: 0.15,
    delay: 0.0,
    length: 0.45,
}];

/// Gain floor for exponential ramps, which cannot reach zero
const SILENCE: f32 = 0.01;
/// Extra time the oscillator runs after its decay
const TAIL: f64 = 0.05;

/// Gain applied on top of each voice's level
const MASTER_VOLUME: f32 = 0.8;

pub struct AudioManager {
    ctx: Option<AudioContext>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Web Audio unavailable, sound cues disabled");
        }
        Self { ctx }
    }

    /// Schedule one voice. Any Web Audio failure just drops it.
    fn schedule(ctx: &AudioContext, voice: &Voice, volume: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let envelope = ctx.create_gain().ok()?;
        osc.set_type(voice.wave);
        osc.connect_with_audio_node(&envelope).ok()?;
        envelope.connect_with_audio_node(&ctx.destination()).ok()?;

        let start = ctx.current_time() + voice.delay;
        let end = start + voice.length;
        let (from, to) = voice.sweep;

        let gain = envelope.gain();
        gain.set_value_at_time(volume * voice.level, start).ok()?;
        gain.exponential_ramp_to_value_at_time(SILENCE, end).ok()?;

        let frequency = osc.frequency();
        frequency.set_value_at_time(from, start).ok()?;
        if to != from {
            frequency.exponential_ramp_to_value_at_time(to, end).ok()?;
        }

        osc.start_with_when(start).ok()?;
        osc.stop_with_when(end + TAIL).ok()
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let Some(ctx) = &self.ctx else { return };

        // Autoplay policy keeps the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let voices: &[Voice] = match cue {
            SoundCue::Point => &POINT,
            SoundCue::Hit => &HIT,
            SoundCue::Die => &DIE,
        };
        for voice in voices {
            if Self::schedule(ctx, voice, MASTER_VOLUME).is_none() {
                log::debug!("Dropped a {cue:?} voice");
            }
        }
    }
}

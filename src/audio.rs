//! Tone events and the emitters that play them
//!
//! The simulation only decides *what* to play and *when*; it hands out
//! [`ToneEvent`]s and never waits on audio. A [`ToneSink`] turns them into
//! sound (square-wave oscillators on the web, nothing at all headless).

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::track::ToneId;

/// Why a tone was emitted (routes it to the music or effects volume)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneKind {
    /// A beat of the melody
    Melody,
    /// A hit: the wrong-note sound
    Dud,
    /// Flower collected
    Pickup,
}

/// One fire-and-forget tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneEvent {
    pub tone: ToneId,
    pub duration_secs: f32,
    pub volume: f32,
    pub kind: ToneKind,
}

impl ToneEvent {
    /// Fallback dud pitch for rests and pencils
    pub const DUD_FALLBACK: ToneId = ToneId(200);
    pub const PICKUP_TONE: ToneId = ToneId(80);

    /// Melody beat; `None` for a rest
    pub fn melody(tone: ToneId) -> Option<Self> {
        (!tone.is_rest()).then_some(Self {
            tone,
            duration_secs: 0.15,
            volume: 0.15,
            kind: ToneKind::Melody,
        })
    }

    /// Wrong-note sound for hitting a note of the given pitch.
    ///
    /// Real pitches are detuned by 1/16 of their period; rests fall back to a
    /// fixed low buzz.
    pub fn dud(tone: ToneId) -> Self {
        let tone = if tone.is_rest() {
            Self::DUD_FALLBACK
        } else {
            tone.detuned()
        };
        Self {
            tone,
            duration_secs: 0.1,
            volume: 0.4,
            kind: ToneKind::Dud,
        }
    }

    /// Flower pickup tinkle
    pub fn pickup() -> Self {
        Self {
            tone: Self::PICKUP_TONE,
            duration_secs: 0.1,
            volume: 0.3,
            kind: ToneKind::Pickup,
        }
    }
}

/// Anything that can play tone events
pub trait ToneSink {
    fn emit(&mut self, event: &ToneEvent);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn emit(&mut self, _event: &ToneEvent) {}
}

/// Records every event it receives, in order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToneLog {
    pub events: Vec<ToneEvent>,
}

impl ToneLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ToneKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ToneSink for ToneLog {
    fn emit(&mut self, event: &ToneEvent) {
        self.events.push(*event);
    }
}

/// Applies the player's volume settings before handing events on
#[derive(Debug, Clone)]
pub struct Mixer<S> {
    sink: S,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: ToneSink> Mixer<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut mixer = Self {
            sink,
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
        };
        mixer.apply_settings(settings);
        mixer
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective gain for a kind of tone
    fn gain(&self, kind: ToneKind) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = match kind {
            ToneKind::Melody => self.music_volume,
            ToneKind::Dud | ToneKind::Pickup => self.sfx_volume,
        };
        self.master_volume * channel
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ToneSink> ToneSink for Mixer<S> {
    fn emit(&mut self, event: &ToneEvent) {
        let gain = self.gain(event.kind);
        if gain <= 0.0 || event.tone.is_rest() {
            return;
        }
        let scaled = ToneEvent {
            volume: event.volume * gain,
            ..*event
        };
        self.sink.emit(&scaled);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{ToneEvent, ToneSink};

    /// Square-wave tones through the Web Audio API
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl ToneSink for WebAudioSink {
        fn emit(&mut self, event: &ToneEvent) {
            let Some(ctx) = &self.ctx else { return };
            let freq = event.tone.frequency_hz();
            if freq <= 0.0 {
                return;
            }

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = self.create_osc(ctx, freq) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + event.duration_secs as f64;

            gain.gain().set_value_at_time(event.volume, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rests_are_silent_at_source() {
        assert!(ToneEvent::melody(ToneId::REST).is_none());
        let beat = ToneEvent::melody(ToneId(539)).unwrap();
        assert_eq!(beat.duration_secs, 0.15);
        assert_eq!(beat.volume, 0.15);
    }

    #[test]
    fn test_dud_detunes_or_falls_back() {
        assert_eq!(ToneEvent::dud(ToneId(360)).tone, ToneId(382));
        assert_eq!(ToneEvent::dud(ToneId::REST).tone, ToneEvent::DUD_FALLBACK);
        let dud = ToneEvent::dud(ToneId(539));
        assert_eq!((dud.duration_secs, dud.volume), (0.1, 0.4));
    }

    #[test]
    fn test_mixer_scales_by_channel() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 1.0,
            ..Settings::default()
        };
        let mut mixer = Mixer::new(ToneLog::new(), &settings);
        mixer.emit(&ToneEvent::melody(ToneId(539)).unwrap());
        mixer.emit(&ToneEvent::pickup());
        let log = mixer.into_inner();
        assert_eq!(log.events.len(), 2);
        assert!((log.events[0].volume - 0.15 * 0.25).abs() < 1e-6);
        assert!((log.events[1].volume - 0.3 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mixer_mute_drops_everything() {
        let mut mixer = Mixer::new(ToneLog::new(), &Settings::default());
        mixer.set_muted(true);
        mixer.emit(&ToneEvent::dud(ToneId(200)));
        assert!(mixer.sink().events.is_empty());
    }

    #[test]
    fn test_tone_log_counts_kinds() {
        let mut log = ToneLog::new();
        log.emit(&ToneEvent::dud(ToneId::REST));
        log.emit(&ToneEvent::pickup());
        log.emit(&ToneEvent::dud(ToneId(100)));
        assert_eq!(log.count(ToneKind::Dud), 2);
        assert_eq!(log.count(ToneKind::Pickup), 1);
        assert_eq!(log.count(ToneKind::Melody), 0);
    }
}

//! Audio: procedurally synthesised cues and background music
//!
//! No sample files. Each [`Cue`] describes a single oscillator voice (waveform
//! plus frequency and gain envelopes); the looping melody is sequenced with a
//! short lookahead so notes land on the audio clock rather than on frame
//! timing. The browser backend lives in [`web`]; everything else is pure data
//! and runs anywhere.

use crate::settings::Settings;

/// Fire-and-forget sound cues keyed to game events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Jump (also the unlock blip on start)
    Jump,
    /// Gem collected while already a dino
    Collect,
    /// Bus hit, dino smash, and run over
    Crash,
    /// Bus becomes a dino
    Roar,
    /// Bus brushes a pedestrian
    Honk,
    /// Dino eats a pedestrian
    Eat,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How a parameter moves from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    /// Stay at `from`
    Hold,
    Linear,
    /// Exponential (targets must be non-zero)
    Exponential,
}

/// A parameter envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub from: f32,
    pub to: f32,
    pub ramp: Ramp,
    /// Seconds from voice start to reach `to`
    pub over: f64,
}

impl Sweep {
    const fn hold(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            ramp: Ramp::Hold,
            over: 0.0,
        }
    }

    const fn exp(from: f32, to: f32, over: f64) -> Self {
        Self {
            from,
            to,
            ramp: Ramp::Exponential,
            over,
        }
    }

    const fn linear(from: f32, to: f32, over: f64) -> Self {
        Self {
            from,
            to,
            ramp: Ramp::Linear,
            over,
        }
    }

    /// Scale both endpoints (gain envelopes under a volume)
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            from: self.from * factor,
            to: self.to * factor,
            ..self
        }
    }
}

/// One oscillator voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Waveform,
    pub freq: Sweep,
    pub gain: Sweep,
    /// Seconds until the oscillator stops
    pub duration: f64,
}

impl Cue {
    /// Synthesis recipe for this cue
    pub fn voice(self) -> Voice {
        match self {
            // Short square blip
            Cue::Jump => Voice {
                wave: Waveform::Square,
                freq: Sweep::hold(150.0),
                gain: Sweep::exp(0.1, 0.001, 0.1),
                duration: 0.1,
            },
            // Rising chirp
            Cue::Collect => Voice {
                wave: Waveform::Sine,
                freq: Sweep::exp(600.0, 1200.0, 0.1),
                gain: Sweep::exp(0.1, 0.01, 0.2),
                duration: 0.2,
            },
            Cue::Crash => Voice {
                wave: Waveform::Sawtooth,
                freq: Sweep::exp(100.0, 50.0, 0.3),
                gain: Sweep::exp(0.2, 0.01, 0.3),
                duration: 0.3,
            },
            Cue::Roar => Voice {
                wave: Waveform::Sawtooth,
                freq: Sweep::linear(300.0, 50.0, 0.4),
                gain: Sweep::linear(0.2, 0.01, 0.4),
                duration: 0.4,
            },
            Cue::Honk => Voice {
                wave: Waveform::Square,
                freq: Sweep::hold(400.0),
                gain: Sweep::linear(0.1, 0.0, 0.2),
                duration: 0.2,
            },
            // Chomp
            Cue::Eat => Voice {
                wave: Waveform::Sawtooth,
                freq: Sweep::exp(200.0, 50.0, 0.1),
                gain: Sweep::exp(0.2, 0.01, 0.1),
                duration: 0.1,
            },
        }
    }
}

/// A melody step: frequency in Hz (0 = rest) and length in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub beats: f64,
}

const fn note(freq: f32, beats: f64) -> Note {
    Note { freq, beats }
}

/// Cheerful C major loop
pub const MELODY: [Note; 24] = [
    // C E G C
    note(261.63, 0.2),
    note(329.63, 0.2),
    note(392.00, 0.2),
    note(523.25, 0.4),
    // G E C -
    note(392.00, 0.2),
    note(329.63, 0.2),
    note(261.63, 0.4),
    note(0.0, 0.2),
    // D F A D
    note(293.66, 0.2),
    note(349.23, 0.2),
    note(440.00, 0.2),
    note(587.33, 0.4),
    // A F D -
    note(440.00, 0.2),
    note(349.23, 0.2),
    note(293.66, 0.4),
    note(0.0, 0.2),
    // C C G G
    note(261.63, 0.2),
    note(261.63, 0.2),
    note(392.00, 0.2),
    note(392.00, 0.2),
    // A A G -
    note(440.00, 0.2),
    note(440.00, 0.2),
    note(392.00, 0.4),
    note(0.0, 0.2),
];

/// Background music level before mixing
pub const MUSIC_GAIN: f32 = 0.03;

/// Notes sound for this fraction of their slot
const NOTE_LEGATO: f64 = 0.9;

/// A melody note placed on the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    pub start: f64,
    pub freq: f32,
    pub duration: f64,
}

impl ScheduledNote {
    /// Triangle voice for this note at the given gain
    pub fn voice(&self, gain: f32) -> Voice {
        Voice {
            wave: Waveform::Triangle,
            freq: Sweep::hold(self.freq),
            gain: Sweep::exp(gain, 0.001, self.duration),
            duration: self.duration,
        }
    }
}

/// Lookahead melody scheduler
///
/// Call [`MusicSequencer::schedule`] every frame with the audio clock; it
/// returns the notes that start within the lookahead window.
#[derive(Debug, Clone)]
pub struct MusicSequencer {
    melody: &'static [Note],
    index: usize,
    next_start: f64,
    playing: bool,
}

impl Default for MusicSequencer {
    fn default() -> Self {
        Self::new(&MELODY)
    }
}

impl MusicSequencer {
    pub fn new(melody: &'static [Note]) -> Self {
        Self {
            melody,
            index: 0,
            next_start: 0.0,
            playing: false,
        }
    }

    /// Start looping from the current position. Idempotent while playing.
    pub fn start(&mut self, now: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.next_start = now;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Notes starting before `now + lookahead`
    pub fn schedule(&mut self, now: f64, lookahead: f64) -> Vec<ScheduledNote> {
        let mut notes = Vec::new();
        if !self.playing || self.melody.is_empty() {
            return notes;
        }

        // After a long stall, resync instead of bursting a backlog
        if self.next_start < now {
            self.next_start = now;
        }

        while self.next_start < now + lookahead {
            let step = self.melody[self.index];
            if step.freq > 0.0 {
                notes.push(ScheduledNote {
                    start: self.next_start,
                    freq: step.freq,
                    duration: step.beats * NOTE_LEGATO,
                });
            }
            self.next_start += step.beats.max(0.01);
            self.index = (self.index + 1) % self.melody.len();
        }
        notes
    }
}

/// Volume routing derived from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
    pub music_enabled: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            music_enabled: settings.music,
        }
    }

    /// Multiplier for sound effects
    pub fn sfx(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Multiplier for the melody
    pub fn music(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}

/// The sound collaborator driven by the session
///
/// Every call is fire-and-forget: failures stay inside the implementation.
pub trait AudioSink {
    /// Unlock/resume the output (needs a user gesture in browsers)
    fn resume(&mut self);
    /// Begin the melody loop (no-op when already playing)
    fn start_music(&mut self);
    /// Stop the loop and silence pending notes
    fn stop_music(&mut self);
    /// Play a one-shot cue
    fn play(&mut self, cue: Cue);
    /// Per-frame pump for music scheduling
    fn update(&mut self) {}
    /// Apply changed volume settings
    fn set_mixer(&mut self, _mixer: Mixer) {}
}

/// Output that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn resume(&mut self) {}
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn play(&mut self, _cue: Cue) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Web Audio backend
#[cfg(target_arch = "wasm32")]
pub mod web {
    use super::*;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    /// Seconds of melody scheduled ahead of the audio clock
    const LOOKAHEAD: f64 = 0.25;

    /// Audio manager backed by an `AudioContext`
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        mixer: Mixer,
        sequencer: MusicSequencer,
        /// Scheduled melody oscillators and their stop times
        pending: Vec<(OscillatorNode, f64)>,
    }

    impl WebAudio {
        pub fn new(mixer: Mixer) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                mixer,
                sequencer: MusicSequencer::default(),
                pending: Vec::new(),
            }
        }

        fn now(&self) -> f64 {
            self.ctx.as_ref().map(|c| c.current_time()).unwrap_or(0.0)
        }

        /// Build the oscillator → gain → destination chain
        fn create_osc(ctx: &AudioContext, wave: Waveform) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Schedule one voice starting at `t`
        fn sound(ctx: &AudioContext, voice: &Voice, t: f64) -> Option<OscillatorNode> {
            let (osc, gain) = Self::create_osc(ctx, voice.wave)?;

            let freq = osc.frequency();
            freq.set_value_at_time(voice.freq.from, t).ok()?;
            apply_ramp(&freq, voice.freq, t);

            let level = gain.gain();
            level.set_value_at_time(voice.gain.from, t).ok()?;
            apply_ramp(&level, voice.gain, t);

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + voice.duration).ok()?;
            Some(osc)
        }
    }

    fn apply_ramp(param: &web_sys::AudioParam, sweep: Sweep, t: f64) {
        let end = t + sweep.over;
        match sweep.ramp {
            Ramp::Hold => {}
            Ramp::Linear => {
                param.linear_ramp_to_value_at_time(sweep.to, end).ok();
            }
            Ramp::Exponential => {
                // Exponential ramps cannot reach zero
                param
                    .exponential_ramp_to_value_at_time(sweep.to.max(1e-4), end)
                    .ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn start_music(&mut self) {
            let now = self.now();
            self.sequencer.start(now);
        }

        fn stop_music(&mut self) {
            self.sequencer.stop();
            for (osc, _) in self.pending.drain(..) {
                osc.stop().ok();
            }
        }

        fn play(&mut self, cue: Cue) {
            let vol = self.mixer.sfx();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let mut voice = cue.voice();
            voice.gain = voice.gain.scaled(vol);
            Self::sound(ctx, &voice, ctx.current_time());
        }

        fn update(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let now = ctx.current_time();
            self.pending.retain(|(_, end)| *end > now);

            let notes = self.sequencer.schedule(now, LOOKAHEAD);
            let vol = self.mixer.music() * MUSIC_GAIN;
            if vol <= 0.0 {
                return;
            }
            for note in notes {
                if let Some(osc) = Self::sound(ctx, &note.voice(vol), note.start) {
                    self.pending.push((osc, note.start + note.duration));
                }
            }
        }

        fn set_mixer(&mut self, mixer: Mixer) {
            self.mixer = mixer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_recipes() {
        let jump = Cue::Jump.voice();
        assert_eq!(jump.wave, Waveform::Square);
        assert_eq!(jump.freq.from, 150.0);
        assert_eq!(jump.duration, 0.1);

        let collect = Cue::Collect.voice();
        assert_eq!((collect.freq.from, collect.freq.to), (600.0, 1200.0));

        // Eat and crash must sound different
        assert_ne!(Cue::Eat.voice(), Cue::Crash.voice());
    }

    #[test]
    fn test_exponential_envelopes_stay_positive() {
        for cue in [Cue::Jump, Cue::Collect, Cue::Crash, Cue::Roar, Cue::Honk, Cue::Eat] {
            let v = cue.voice();
            for sweep in [v.freq, v.gain] {
                if sweep.ramp == Ramp::Exponential {
                    assert!(sweep.from > 0.0 && sweep.to > 0.0, "{cue:?}");
                }
            }
            assert!(v.duration > 0.0);
        }
    }

    #[test]
    fn test_sequencer_idle_until_started() {
        let mut seq = MusicSequencer::default();
        assert!(seq.schedule(0.0, 1.0).is_empty());
    }

    #[test]
    fn test_sequencer_schedules_within_lookahead() {
        let mut seq = MusicSequencer::default();
        seq.start(10.0);

        // 0.5s window: C(0.2) E(0.2) G(0.2) start at 10.0, 10.2, 10.4
        let notes = seq.schedule(10.0, 0.5);
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].freq, 261.63);
        assert!((notes[1].start - 10.2).abs() < 1e-9);
        assert!((notes[0].duration - 0.18).abs() < 1e-9);

        // Nothing new until the window advances
        assert!(seq.schedule(10.0, 0.5).is_empty());
        let next = seq.schedule(10.3, 0.5);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].freq, 523.25);
    }

    #[test]
    fn test_sequencer_skips_rests_and_loops() {
        let mut seq = MusicSequencer::default();
        seq.start(0.0);
        let total: f64 = MELODY.iter().map(|n| n.beats).sum();
        let sounding = MELODY.iter().filter(|n| n.freq > 0.0).count();

        let notes = seq.schedule(0.0, total - 0.05);
        assert_eq!(notes.len(), sounding);

        // Second pass starts over from the top
        let again = seq.schedule(total - 0.05, 0.1);
        assert_eq!(again.first().map(|n| n.freq), Some(MELODY[0].freq));
    }

    #[test]
    fn test_sequencer_stop_and_restart_is_idempotent() {
        let mut seq = MusicSequencer::default();
        seq.start(0.0);
        seq.start(5.0);
        assert_eq!(seq.schedule(0.0, 0.1).len(), 1);
        seq.stop();
        assert!(!seq.is_playing());
        assert!(seq.schedule(0.0, 10.0).is_empty());
    }

    #[test]
    fn test_mixer_mute_and_music_toggle() {
        let mut settings = Settings::default();
        settings.master_volume = 0.5;
        settings.sfx_volume = 0.5;
        let mixer = Mixer::from_settings(&settings);
        assert_eq!(mixer.sfx(), 0.25);

        settings.music = false;
        assert_eq!(Mixer::from_settings(&settings).music(), 0.0);

        settings.muted = true;
        assert_eq!(Mixer::from_settings(&settings).sfx(), 0.0);
    }
}

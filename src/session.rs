//! Session controller
//!
//! Owns one [`GameState`] at a time and moves it through
//! Start → Playing → GameOver → Playing → … Every entry into Playing is a full
//! reset with a fresh seed and a new generation number. The generation guards
//! the asynchronous dino fact: a result that arrives after the player has
//! already restarted is dropped.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, Cue, Mixer};
use crate::clock::FixedStep;
use crate::error::{FactError, StorageError};
use crate::facts;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{Field, GameEvent, GameState, Snapshot, TickInput, autopilot, tick};
use crate::tuning::Tuning;

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Title screen, nothing moves
    #[default]
    Start,
    Playing,
    GameOver,
}

/// Game-over fact line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FactStatus {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

/// Claim on the fact for one finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactTicket {
    generation: u64,
}

impl FactTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of the last finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    pub best: u64,
    pub new_record: bool,
}

/// Sound cue for a simulation event, if any
pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::Jumped => Some(Cue::Jump),
        GameEvent::Crashed { .. } | GameEvent::Smashed { .. } => Some(Cue::Crash),
        GameEvent::Honked => Some(Cue::Honk),
        GameEvent::Ate { .. } => Some(Cue::Eat),
        GameEvent::Transformed { .. } => Some(Cue::Roar),
        GameEvent::Recharged { .. } => Some(Cue::Collect),
        GameEvent::Reverted | GameEvent::Distance { .. } => None,
    }
}

pub struct Session<A: AudioSink, S: KeyValueStore> {
    base_tuning: Tuning,
    settings: Settings,
    state: GameState,
    phase: SessionPhase,
    clock: FixedStep,
    seeds: Pcg32,
    generation: u64,
    jump_requested: bool,
    autopilot: bool,
    high_score: HighScore,
    fact: FactStatus,
    last_run: Option<RunSummary>,
    audio: A,
    store: S,
}

impl<A: AudioSink, S: KeyValueStore> Session<A, S> {
    /// New session on the title screen.
    ///
    /// Reads the high score and settings; a failing store is an error.
    pub fn new(
        tuning: Tuning,
        field: Field,
        seed: u64,
        mut audio: A,
        store: S,
    ) -> Result<Self, StorageError> {
        let high_score = HighScore::load(&store)?;
        let settings = Settings::load(&store);
        audio.set_mixer(Mixer::from_settings(&settings));

        let base_tuning = tuning.sanitized();
        let mut seeds = Pcg32::seed_from_u64(seed);
        let state = GameState::new(
            Self::effective_tuning(&base_tuning, &settings),
            field,
            seeds.random(),
        );

        Ok(Self {
            base_tuning,
            settings,
            state,
            phase: SessionPhase::Start,
            clock: FixedStep::default(),
            seeds,
            generation: 0,
            jump_requested: false,
            autopilot: false,
            high_score,
            fact: FactStatus::Idle,
            last_run: None,
            audio,
            store,
        })
    }

    fn effective_tuning(base: &Tuning, settings: &Settings) -> Tuning {
        Tuning {
            max_particles: settings.max_particles(base.max_particles),
            ..base.clone()
        }
    }

    /// Fresh run state; bumps the generation
    fn reset(&mut self) {
        let seed = self.seeds.random();
        let tuning = Self::effective_tuning(&self.base_tuning, &self.settings);
        self.state = GameState::new(tuning, self.state.field, seed);
        self.clock.reset();
        self.jump_requested = false;
        self.generation += 1;
        self.fact = FactStatus::Idle;
        self.phase = SessionPhase::Playing;
        log::info!("Run {} started (seed {seed:#018x})", self.generation);
    }

    /// Title screen → Playing. Unlocks audio with a blip and starts the music.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Start {
            return false;
        }
        self.audio.resume();
        self.audio.play(Cue::Jump);
        self.audio.start_music();
        self.reset();
        true
    }

    /// Game over → Playing
    pub fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.audio.resume();
        self.audio.start_music();
        self.reset();
        true
    }

    /// Ask for a jump on the next tick (repeated requests coalesce)
    pub fn request_jump(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.jump_requested = true;
        }
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
        log::info!("Autopilot: {on}");
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.set_autopilot(!self.autopilot);
        self.autopilot
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Run one tick (Playing only)
    pub fn step(&mut self) -> Vec<GameEvent> {
        if self.phase != SessionPhase::Playing {
            return Vec::new();
        }
        let jump = std::mem::take(&mut self.jump_requested)
            || (self.autopilot && autopilot::wants_jump(&self.state));
        let events = tick(&mut self.state, &TickInput { jump });
        for event in &events {
            if let Some(cue) = cue_for(event) {
                self.audio.play(cue);
            }
        }
        events
    }

    /// Feed one display frame; runs whatever ticks are due
    pub fn advance(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == SessionPhase::Playing {
            let ticks = self.clock.advance(frame_dt);
            for _ in 0..ticks {
                events.extend(self.step());
            }
        }
        self.audio.update();
        events
    }

    /// Playing → GameOver.
    ///
    /// Records the score and returns the ticket the caller needs to deliver
    /// the dino fact once it has been generated.
    pub fn end_run(&mut self) -> Option<FactTicket> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        let score = self.state.score;
        let new_record = self.high_score.submit(score, &mut self.store);
        self.last_run = Some(RunSummary {
            score,
            best: self.high_score.best(),
            new_record,
        });

        self.audio.play(Cue::Crash);
        self.phase = SessionPhase::GameOver;
        self.fact = FactStatus::Loading;
        self.jump_requested = false;
        log::info!(
            "Run {} over: score {score} after {} ticks{}",
            self.generation,
            self.state.ticks,
            if new_record { " (new record)" } else { "" }
        );

        Some(FactTicket {
            generation: self.generation,
        })
    }

    /// Hand over a fact result. Returns false when the ticket is stale.
    pub fn deliver_fact(&mut self, ticket: FactTicket, result: Result<String, FactError>) -> bool {
        if ticket.generation != self.generation || self.phase != SessionPhase::GameOver {
            log::debug!(
                "Dropping fact for run {} (now run {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.fact = FactStatus::Ready(facts::display_text(result));
        true
    }

    /// Viewport changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(Field::new(width.max(1.0), height.max(1.0)));
    }

    /// Apply and persist new settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.set_mixer(Mixer::from_settings(&settings));
        self.state.tuning.max_particles = settings.max_particles(self.base_tuning.max_particles);
        if let Err(e) = settings.save(&mut self.store) {
            log::warn!("Settings not saved: {e}");
        }
        self.settings = settings;
    }

    /// Change one or more settings in place, then apply and persist them
    pub fn edit_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
        let mut settings = self.settings.clone();
        edit(&mut settings);
        self.update_settings(settings);
    }

    /// Stop music and release scheduled voices
    pub fn shutdown(&mut self) {
        self.audio.stop_music();
        log::info!("Session shut down");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_dino(&self) -> bool {
        self.state.player.transformed
    }

    pub fn fact(&self) -> &FactStatus {
        &self.fact
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that script runs
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

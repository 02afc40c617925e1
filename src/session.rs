//! Game session state machine
//!
//! `GameSession` owns one session's state plus the capabilities it needs (a
//! validated catalog, settings and a random source) and exposes the calls a
//! host makes: start, tick, grab, end, snapshot.
//!
//! Intro -> Playing (host calls `start_session`) -> GameOver (clock runs out
//! or host calls `end_session`). Starting again always builds a fresh state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GamePhase, GrabLock, GrabOutcome, ObjectId, RandomSource, RoundClock, SeededRandom,
    SessionState, Snapshot, next_prompt, resolve_grab, tick,
};

/// Final result of a session, ready for upload by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub missed_targets: u32,
    pub total_steps: u32,
    pub step_duration: f64,
    /// Ran to the end of the clock rather than being aborted
    pub completed: bool,
}

/// One player's game: state machine plus injected capabilities
#[derive(Debug)]
pub struct GameSession<R: RandomSource = SeededRandom> {
    catalog: Arc<Catalog>,
    settings: Settings,
    /// Round layout from settings, used by `start` and `reset`
    layout: RoundClock,
    rng: R,
    state: SessionState,
    grab_lock: GrabLock,
}

impl GameSession<SeededRandom> {
    /// Session seeded from `settings.seed`, or from entropy when unset
    pub fn new(catalog: Arc<Catalog>, settings: Settings) -> Result<Self, ConfigError> {
        let rng = match settings.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        log::info!("Session RNG seed: {}", rng.seed());
        Self::with_random(catalog, settings, rng)
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Session with a caller-supplied random source. Starts in the intro.
    pub fn with_random(
        catalog: Arc<Catalog>,
        settings: Settings,
        rng: R,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let layout = RoundClock::new(settings.total_steps, settings.step_duration)?;
        let state = SessionState::intro(layout, settings.intro_duration, 1);

        Ok(Self {
            catalog,
            settings,
            layout,
            rng,
            state,
            grab_lock: GrabLock::new(),
        })
    }

    /// Begin play with a custom round layout.
    ///
    /// On error nothing changes: the previous state stays as it was.
    pub fn start_session(
        &mut self,
        total_steps: u32,
        step_duration: f64,
    ) -> Result<(), ConfigError> {
        let clock = RoundClock::new(total_steps, step_duration)?;

        if self.state.phase == GamePhase::Playing {
            log::info!("Restarting a session that was still playing");
        }

        let previous_prompt = self.state.active_prompt;
        let mut state = SessionState::playing(clock, self.state.peek_next_id());
        let prompt = next_prompt(&self.catalog, previous_prompt, &mut self.rng);
        state.active_prompt = Some(prompt);
        state.events.push(GameEvent::SessionStarted {
            total_steps,
            step_duration,
        });
        state.events.push(GameEvent::PromptChanged { step: 1, prompt });

        log::info!(
            "Session started: {} steps x {:.1}s, first prompt {:?}",
            total_steps,
            step_duration,
            self.catalog.prompt(prompt)
        );
        self.state = state;
        Ok(())
    }

    /// Begin play with the layout from settings
    pub fn start(&mut self) -> Result<(), ConfigError> {
        self.start_session(self.layout.total_steps(), self.layout.step_duration())
    }

    /// Go back to the intro with a fresh state
    pub fn reset(&mut self) {
        self.state = SessionState::intro(
            self.layout,
            self.settings.intro_duration,
            self.state.peek_next_id(),
        );
        log::info!("Session reset to intro");
    }

    /// Advance one frame and return what the renderer should show
    pub fn tick(&mut self, dt: f64) -> Snapshot {
        tick(&mut self.state, &self.catalog, &self.settings, &mut self.rng, dt);
        self.state.take_snapshot(&self.catalog)
    }

    /// Judge a grab on `id`
    pub fn submit_grab(&mut self, id: ObjectId) -> GrabOutcome {
        resolve_grab(
            &mut self.state,
            &self.grab_lock,
            &self.catalog,
            id,
            self.settings.effect_lifetime,
        )
    }

    /// Force GameOver. Calling it again changes nothing.
    pub fn end_session(&mut self) {
        if self.state.finish() {
            log::info!("Session ended by host");
        }
    }

    /// Read-only view without consuming pending events
    pub fn current_snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.catalog)
    }

    /// Result of a finished session
    pub fn summary(&self) -> Option<SessionSummary> {
        if !self.state.phase.is_over() {
            return None;
        }
        let stats = self.state.stats;
        Some(SessionSummary {
            score: self.state.score,
            correct: stats.correct,
            incorrect: stats.incorrect,
            missed_targets: stats.missed_targets,
            total_steps: self.state.clock.total_steps(),
            step_duration: self.state.clock.step_duration(),
            completed: self.state.remaining == 0.0,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Thread-safe handle: ticks and grabs from different threads are serialized
pub struct SharedSession<R: RandomSource = SeededRandom> {
    inner: Arc<Mutex<GameSession<R>>>,
}

impl<R: RandomSource> Clone for SharedSession<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RandomSource> SharedSession<R> {
    pub fn new(session: GameSession<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameSession<R>> {
        // Session state is consistent between calls, so a poisoned lock is usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_session(&self, total_steps: u32, step_duration: f64) -> Result<(), ConfigError> {
        self.lock().start_session(total_steps, step_duration)
    }

    pub fn tick(&self, dt: f64) -> Snapshot {
        self.lock().tick(dt)
    }

    pub fn submit_grab(&self, id: ObjectId) -> GrabOutcome {
        self.lock().submit_grab(id)
    }

    pub fn end_session(&self) {
        self.lock().end_session()
    }

    pub fn current_snapshot(&self) -> Snapshot {
        self.lock().current_snapshot()
    }

    /// Run `f` with exclusive access to the session
    pub fn with<T>(&self, f: impl FnOnce(&mut GameSession<R>) -> T) -> T {
        f(&mut self.lock())
    }
}

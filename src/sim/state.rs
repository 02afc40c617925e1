//! Session state and core simulation types
//!
//! Everything a frame or a grab mutates lives in `SessionState`; renderers
//! only ever see an immutable `Snapshot` of it.

use std::collections::HashSet;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::clock::{ClockReading, RoundClock};
use super::cues::CueTracker;
use super::grab::GrabOutcome;
use crate::catalog::{Catalog, KindId, Prompt, PromptId, Rgb};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Instructional media is playing, nothing simulates
    #[default]
    Intro,
    /// Active gameplay
    Playing,
    /// Session finished; state is frozen
    GameOver,
}

impl GamePhase {
    /// Whether grabs are resolved in this phase
    pub fn accepts_grabs(&self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Identity of a spawned object; never reused by a `GameSession`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live object falling through the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: ObjectId,
    pub kind: KindId,
    /// Normalized position; x in [0, 1], y from 0 (top) growing downward
    pub pos: DVec2,
    /// Field heights per second
    pub speed: f64,
}

impl FallingObject {
    /// Move down by `speed * dt`
    pub fn fall(&mut self, dt: f64) {
        self.pos.y += self.speed * dt;
    }

    /// Past the bottom edge
    pub fn is_off_field(&self) -> bool {
        self.pos.y > 1.0
    }
}

/// Burst marker left where an object was grabbed correctly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectMarker {
    pub pos: DVec2,
    pub color: Rgb,
    /// Seconds until it expires
    pub ttl: f64,
}

impl EffectMarker {
    pub fn age(&mut self, dt: f64) {
        self.ttl = (self.ttl - dt).max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.ttl <= 0.0
    }
}

/// Something the host may want to react to (sound, animation, logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Intro countdown ran out; the host may start play
    IntroFinished,
    SessionStarted { total_steps: u32, step_duration: f64 },
    /// New active prompt for `step`
    PromptChanged { step: u32, prompt: PromptId },
    ObjectSpawned { id: ObjectId, kind: KindId },
    /// Fell off the bottom without being grabbed
    ObjectDespawned { id: ObjectId, kind: KindId },
    Grabbed {
        id: ObjectId,
        kind: KindId,
        outcome: GrabOutcome,
    },
    /// Two seconds or less left in `step`
    RoundEndCountdown { step: u32 },
    /// Final five seconds of the session
    GameEndCountdown,
    GameOver { score: u32 },
}

/// Running grab statistics for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrabStats {
    pub correct: u32,
    pub incorrect: u32,
    /// Objects of the active target kind that fell off the field
    pub missed_targets: u32,
}

/// Complete mutable state of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub clock: RoundClock,
    /// Seconds left, non-increasing while playing
    pub remaining: f64,
    /// Last recorded step (1-based)
    pub step: u32,
    pub step_elapsed: f64,
    pub active_prompt: Option<PromptId>,
    pub score: u32,
    /// Live objects in spawn order
    pub objects: Vec<FallingObject>,
    /// Identities already scored (correct or incorrect)
    pub resolved: HashSet<ObjectId>,
    /// Time banked toward the next spawn attempt
    pub spawn_accumulator: f64,
    pub effects: Vec<EffectMarker>,
    pub stats: GrabStats,
    pub cues: CueTracker,
    /// Intro countdown; only meaningful in `Intro`
    pub intro_remaining: f64,
    /// Events since the last tick snapshot
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next object identity
    next_id: u32,
}

impl SessionState {
    /// A session waiting in the intro
    pub fn intro(clock: RoundClock, intro_duration: f64, next_id: u32) -> Self {
        let mut state = Self::fresh(clock, next_id);
        state.intro_remaining = intro_duration.max(0.0);
        // Nothing to count down; report the intro as done right away
        if state.intro_remaining == 0.0 {
            state.events.push(GameEvent::IntroFinished);
        }
        state
    }

    /// A freshly reset playing session (no prompt yet)
    pub fn playing(clock: RoundClock, next_id: u32) -> Self {
        let mut state = Self::fresh(clock, next_id);
        state.phase = GamePhase::Playing;
        state
    }

    fn fresh(clock: RoundClock, next_id: u32) -> Self {
        let reading = clock.reading(clock.length());
        Self {
            phase: GamePhase::Intro,
            clock,
            remaining: reading.remaining,
            step: 1,
            step_elapsed: 0.0,
            active_prompt: None,
            score: 0,
            objects: Vec::new(),
            resolved: HashSet::new(),
            spawn_accumulator: 0.0,
            effects: Vec::new(),
            stats: GrabStats::default(),
            cues: CueTracker::new(reading.remaining),
            intro_remaining: 0.0,
            events: Vec::new(),
            next_id: next_id.max(1),
        }
    }

    /// Allocate a new object identity
    pub fn next_object_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        ObjectId(id)
    }

    /// Identity the next spawned object would get (carried across resets)
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Live objects of one kind
    pub fn live_count(&self, kind: KindId) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }

    pub fn object(&self, id: ObjectId) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Record a clock reading
    pub fn apply_reading(&mut self, reading: &ClockReading) {
        self.remaining = reading.remaining;
        self.step_elapsed = reading.step_elapsed;
    }

    /// Enter GameOver. Returns false if already over.
    pub fn finish(&mut self) -> bool {
        if self.phase.is_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.objects.clear();
        self.spawn_accumulator = 0.0;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {} ({} correct, {} wrong, {:.2}s left)",
            self.score,
            self.stats.correct,
            self.stats.incorrect,
            self.remaining
        );
        true
    }

    /// Read-only view; pending events are copied, not consumed
    pub fn snapshot(&self, catalog: &Catalog) -> Snapshot {
        self.build_snapshot(catalog, self.events.clone())
    }

    /// View for a finished frame; pending events move into the snapshot
    pub fn take_snapshot(&mut self, catalog: &Catalog) -> Snapshot {
        let events = std::mem::take(&mut self.events);
        self.build_snapshot(catalog, events)
    }

    fn build_snapshot(&self, catalog: &Catalog, events: Vec<GameEvent>) -> Snapshot {
        Snapshot {
            phase: self.phase,
            remaining: self.remaining,
            step: self.step,
            total_steps: self.clock.total_steps(),
            step_elapsed: self.step_elapsed,
            step_duration: self.clock.step_duration(),
            score: self.score,
            prompt_id: self.active_prompt,
            prompt: self.active_prompt.and_then(|id| catalog.prompt(id)).cloned(),
            objects: self.objects.clone(),
            effects: self.effects.clone(),
            intro_remaining: self.intro_remaining,
            events,
        }
    }
}

/// Immutable render view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub remaining: f64,
    pub step: u32,
    pub total_steps: u32,
    pub step_elapsed: f64,
    pub step_duration: f64,
    pub score: u32,
    pub prompt_id: Option<PromptId>,
    pub prompt: Option<Prompt>,
    pub objects: Vec<FallingObject>,
    pub effects: Vec<EffectMarker>,
    pub intro_remaining: f64,
    /// Events since the previous tick
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Kind the player should grab right now
    pub fn target(&self) -> Option<KindId> {
        self.prompt.as_ref().map(|p| p.target)
    }

    pub fn object(&self, id: ObjectId) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> RoundClock {
        RoundClock::new(6, 10.0).unwrap()
    }

    #[test]
    fn test_ids_are_unique_and_carried() {
        let mut state = SessionState::playing(clock(), 1);
        let a = state.next_object_id();
        let b = state.next_object_id();
        assert_ne!(a, b);

        let next = SessionState::playing(clock(), state.peek_next_id());
        assert_eq!(next.peek_next_id(), 3);
    }

    #[test]
    fn test_fresh_playing_state() {
        let state = SessionState::playing(clock(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.remaining, 60.0);
        assert_eq!(state.step, 1);
        assert_eq!(state.score, 0);
        assert!(state.objects.is_empty());
        assert!(state.resolved.is_empty());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut state = SessionState::playing(clock(), 1);
        let id = state.next_object_id();
        state.objects.push(FallingObject {
            id,
            kind: KindId(0),
            pos: DVec2::new(0.5, 0.3),
            speed: 0.2,
        });
        state.score = 4;

        assert!(state.finish());
        assert!(state.objects.is_empty());
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 4 }]);

        let before = state.clone();
        assert!(!state.finish());
        assert_eq!(state, before);
    }

    #[test]
    fn test_object_falls_and_leaves_field() {
        let mut obj = FallingObject {
            id: ObjectId(1),
            kind: KindId(0),
            pos: DVec2::new(0.5, 0.8),
            speed: 0.25,
        };
        obj.fall(0.4);
        assert!((obj.pos.y - 0.9).abs() < 1e-12);
        assert!(!obj.is_off_field());
        obj.fall(0.8);
        assert!(obj.is_off_field());
    }

    #[test]
    fn test_snapshot_does_not_consume_events() {
        let catalog = Catalog::fruit_grab().unwrap();
        let mut state = SessionState::playing(clock(), 1);
        state.active_prompt = Some(PromptId(3));
        state.events.push(GameEvent::GameEndCountdown);

        let peek = state.snapshot(&catalog);
        assert_eq!(peek.events.len(), 1);
        assert_eq!(peek.target(), catalog.target_of(PromptId(3)));

        let frame = state.take_snapshot(&catalog);
        assert_eq!(frame.events.len(), 1);
        assert!(state.events.is_empty());
    }
}

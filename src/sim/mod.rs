//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame deltas come from the host, randomness from an injected source
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod cues;
pub mod grab;
pub mod prompt;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{ClockReading, RoundClock};
pub use cues::CueTracker;
pub use grab::{GrabGuard, GrabLock, GrabOutcome, resolve_grab};
pub use prompt::next_prompt;
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use spawn::{choose_kind, drain_spawns, spawn_once};
pub use state::{
    EffectMarker, FallingObject, GameEvent, GamePhase, GrabStats, ObjectId, SessionState, Snapshot,
};
pub use tick::tick;

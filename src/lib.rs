//! Fruit Grab - A timed "grab the correct falling fruit" arcade game
//!
//! Core modules:
//! - `catalog`: Static fruit kinds and the prompts that name them
//! - `sim`: Deterministic simulation (clock, spawning, falling, grabbing)
//! - `session`: Session state machine and the API the host drives
//! - `settings`: Data-driven game balance and round layout
//! - `error`: Startup/configuration errors

pub mod catalog;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use catalog::{Catalog, ItemKind, KindId, Prompt, PromptCue, PromptId, Rgb};
pub use error::{CatalogError, ConfigError};
pub use session::{GameSession, SessionSummary, SharedSession};
pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, GrabOutcome, ObjectId, RandomSource, SeededRandom, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Number of prompt steps in a default session
    pub const DEFAULT_TOTAL_STEPS: u32 = 6;
    /// Length of one step in seconds
    pub const DEFAULT_STEP_DURATION: f64 = 10.0;

    /// Seconds between spawn attempts
    pub const SPAWN_INTERVAL: f64 = 0.6;
    /// Probability that a spawn attempt prefers the active target kind
    pub const TARGET_SPAWN_BIAS: f64 = 0.6;
    /// Maximum live objects of a single kind
    pub const MAX_LIVE_PER_KIND: usize = 2;

    /// Horizontal spawn band (normalized field width)
    pub const SPAWN_X_MIN: f64 = 0.12;
    pub const SPAWN_X_MAX: f64 = 0.88;
    /// Fall speed band (field heights per second)
    pub const FALL_SPEED_MIN: f64 = 0.15;
    pub const FALL_SPEED_MAX: f64 = 0.35;

    /// Intro countdown before the host starts play
    pub const INTRO_DURATION: f64 = 3.0;
    /// Lifetime of a grab burst marker
    pub const EFFECT_LIFETIME: f64 = 0.6;

    /// Final whole seconds that trigger the game-end countdown cue
    pub const GAME_END_COUNTDOWN_SECS: u32 = 5;
    /// Seconds left in a step when the round-end cue fires
    pub const ROUND_END_WARNING_SECS: f64 = 2.0;

    /// Remaining time below this snaps to zero (float drift from summed deltas)
    pub const CLOCK_EPSILON: f64 = 1e-9;
}

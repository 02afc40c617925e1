//! Startup errors
//!
//! Everything here is reported once, before a session can run. Races during
//! play (stale grabs, pruned objects) are outcomes, not errors.

use thiserror::Error;

/// Catalog construction failed; no session may be built from it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no item kinds")]
    NoKinds,
    #[error("catalog has no prompts")]
    NoPrompts,
    #[error("item kind `{0}` is registered twice")]
    DuplicateKind(String),
    #[error("prompt {index} targets unknown item kind `{target}`")]
    UnknownTarget { index: usize, target: String },
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session or settings configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a session needs at least one step")]
    NoSteps,
    #[error("step duration must be a positive number of seconds, got {0}")]
    StepDuration(f64),
    #[error("target bias must be within [0, 1], got {0}")]
    TargetBias(f64),
    #[error("spawn interval must be a positive number of seconds, got {0}")]
    SpawnInterval(f64),
    #[error("per-kind live cap must be at least 1")]
    KindCap,
    #[error("{name} range [{min}, {max}] is invalid")]
    Range {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{name} must be a non-negative number of seconds, got {value}")]
    Duration { name: &'static str, value: f64 },
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

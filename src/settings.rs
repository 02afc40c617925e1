//! Game settings and balance
//!
//! Round layout and spawn tuning, loadable from a JSON file. Missing fields
//! fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round layout ===
    /// Number of prompt steps per session
    pub total_steps: u32,
    /// Seconds per step
    pub step_duration: f64,
    /// Intro countdown before play starts (informational, host-driven)
    pub intro_duration: f64,

    // === Spawning ===
    /// Seconds between spawn attempts
    pub spawn_interval: f64,
    /// Chance a spawn attempt prefers the active target
    pub target_bias: f64,
    /// Maximum live objects per kind
    pub max_live_per_kind: usize,
    /// Horizontal spawn band, normalized
    pub spawn_x: (f64, f64),
    /// Fall speed band, field heights per second
    pub fall_speed: (f64, f64),

    // === Effects ===
    /// Lifetime of a grab burst marker
    pub effect_lifetime: f64,

    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_steps: DEFAULT_TOTAL_STEPS,
            step_duration: DEFAULT_STEP_DURATION,
            intro_duration: INTRO_DURATION,

            spawn_interval: SPAWN_INTERVAL,
            target_bias: TARGET_SPAWN_BIAS,
            max_live_per_kind: MAX_LIVE_PER_KIND,
            spawn_x: (SPAWN_X_MIN, SPAWN_X_MAX),
            fall_speed: (FALL_SPEED_MIN, FALL_SPEED_MAX),

            effect_lifetime: EFFECT_LIFETIME,

            seed: None,
        }
    }
}

impl Settings {
    /// Same settings with a different round layout
    pub fn with_round(mut self, total_steps: u32, step_duration: f64) -> Self {
        self.total_steps = total_steps;
        self.step_duration = step_duration;
        self
    }

    /// Same settings with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Full session length in seconds
    pub fn session_length(&self) -> f64 {
        self.total_steps as f64 * self.step_duration
    }

    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_round(self.total_steps, self.step_duration)?;

        if !(0.0..=1.0).contains(&self.target_bias) {
            return Err(ConfigError::TargetBias(self.target_bias));
        }
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(ConfigError::SpawnInterval(self.spawn_interval));
        }
        if self.max_live_per_kind == 0 {
            return Err(ConfigError::KindCap);
        }

        let (x_min, x_max) = self.spawn_x;
        if !(0.0..=1.0).contains(&x_min) || !(0.0..=1.0).contains(&x_max) || x_min > x_max {
            return Err(ConfigError::Range {
                name: "spawn_x",
                min: x_min,
                max: x_max,
            });
        }
        let (s_min, s_max) = self.fall_speed;
        if !(s_min.is_finite() && s_max.is_finite()) || s_min < 0.0 || s_min > s_max {
            return Err(ConfigError::Range {
                name: "fall_speed",
                min: s_min,
                max: s_max,
            });
        }

        for (name, value) in [
            ("intro_duration", self.intro_duration),
            ("effect_lifetime", self.effect_lifetime),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Duration { name, value });
            }
        }

        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a file, reporting any failure
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Validate a round layout on its own (used by `start_session` overrides)
pub fn validate_round(total_steps: u32, step_duration: f64) -> Result<(), ConfigError> {
    if total_steps == 0 {
        return Err(ConfigError::NoSteps);
    }
    if !(step_duration.is_finite() && step_duration > 0.0) {
        return Err(ConfigError::StepDuration(step_duration));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.session_length(), 60.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"total_steps": 3, "seed": 42}"#).unwrap();
        assert_eq!(settings.total_steps, 3);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.step_duration, DEFAULT_STEP_DURATION);
        assert_eq!(settings.spawn_x, (SPAWN_X_MIN, SPAWN_X_MAX));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = Settings::default();
        assert!(matches!(
            base.clone().with_round(0, 10.0).validate(),
            Err(ConfigError::NoSteps)
        ));
        assert!(matches!(
            base.clone().with_round(6, 0.0).validate(),
            Err(ConfigError::StepDuration(_))
        ));
        assert!(matches!(
            base.clone().with_round(6, f64::NAN).validate(),
            Err(ConfigError::StepDuration(_))
        ));

        let mut s = base.clone();
        s.target_bias = 1.5;
        assert!(matches!(s.validate(), Err(ConfigError::TargetBias(_))));

        let mut s = base.clone();
        s.spawn_x = (0.9, 0.1);
        assert!(matches!(
            s.validate(),
            Err(ConfigError::Range { name: "spawn_x", .. })
        ));

        let mut s = base;
        s.max_live_per_kind = 0;
        assert!(matches!(s.validate(), Err(ConfigError::KindCap)));
    }

    #[test]
    fn test_json_round_trip_and_bad_json() {
        let settings = Settings::default().with_seed(7);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);

        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"step_duration": -1.0}"#),
            Err(ConfigError::StepDuration(_))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = Path::new("/definitely/not/here/fruit-grab.json");
        assert!(matches!(Settings::try_load(path), Err(ConfigError::Io(_))));
        assert_eq!(Settings::load(path), Settings::default());
    }
}

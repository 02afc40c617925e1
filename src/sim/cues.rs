//! Timed audio cues
//!
//! The core never plays sound. It watches the whole-second countdown and
//! emits cue events the host turns into ticking sounds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::clock::ClockReading;
use super::state::GameEvent;
use crate::consts::{GAME_END_COUNTDOWN_SECS, ROUND_END_WARNING_SECS};

/// Remembers which cues already fired this session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueTracker {
    last_whole_second: u32,
    game_end_notified: bool,
    notified_steps: HashSet<u32>,
}

impl CueTracker {
    /// Tracker for a session starting with `remaining` seconds
    pub fn new(remaining: f64) -> Self {
        Self {
            last_whole_second: whole_seconds(remaining),
            game_end_notified: false,
            notified_steps: HashSet::new(),
        }
    }

    /// Check a fresh reading; at most one cue per whole-second change
    pub fn observe(&mut self, reading: &ClockReading, step_duration: f64) -> Option<GameEvent> {
        let whole = whole_seconds(reading.remaining);
        if whole == self.last_whole_second {
            return None;
        }
        self.last_whole_second = whole;

        if whole > 0 && whole <= GAME_END_COUNTDOWN_SECS {
            if !self.game_end_notified {
                self.game_end_notified = true;
                return Some(GameEvent::GameEndCountdown);
            }
        } else if whole > GAME_END_COUNTDOWN_SECS {
            let step_left = step_duration - reading.step_elapsed;
            if step_left <= ROUND_END_WARNING_SECS
                && self.notified_steps.insert(reading.current_step)
            {
                return Some(GameEvent::RoundEndCountdown {
                    step: reading.current_step,
                });
            }
        }
        None
    }
}

fn whole_seconds(remaining: f64) -> u32 {
    remaining.max(0.0).ceil() as u32
}

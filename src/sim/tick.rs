//! Per-frame simulation tick
//!
//! Core game loop. Each playing frame runs in a fixed order:
//! clock -> prompt rotation -> spawn drain -> fall -> prune.

use super::prompt::next_prompt;
use super::rng::RandomSource;
use super::spawn::drain_spawns;
use super::state::{GameEvent, GamePhase, SessionState};
use crate::catalog::Catalog;
use crate::settings::Settings;

/// Advance the session by one frame of `dt` real seconds
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut SessionState,
    catalog: &Catalog,
    settings: &Settings,
    rng: &mut R,
    dt: f64,
) {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid frame delta {}", dt);
        0.0
    };

    match state.phase {
        GamePhase::Intro => tick_intro(state, dt),
        GamePhase::Playing => tick_playing(state, catalog, settings, rng, dt),
        // Frozen
        GamePhase::GameOver => {}
    }
}

fn tick_intro(state: &mut SessionState, dt: f64) {
    if state.intro_remaining <= 0.0 {
        return;
    }
    state.intro_remaining = (state.intro_remaining - dt).max(0.0);
    if state.intro_remaining == 0.0 {
        log::info!("Intro finished");
        state.events.push(GameEvent::IntroFinished);
    }
}

fn tick_playing<R: RandomSource + ?Sized>(
    state: &mut SessionState,
    catalog: &Catalog,
    settings: &Settings,
    rng: &mut R,
    dt: f64,
) {
    // Clock
    let reading = state.clock.advance(state.remaining, dt);
    state.apply_reading(&reading);
    if reading.expired {
        state.finish();
        return;
    }

    // One prompt per step change, however many frames land in the new step
    if reading.current_step != state.step {
        state.step = reading.current_step;
        let prompt = next_prompt(catalog, state.active_prompt, rng);
        state.active_prompt = Some(prompt);
        log::debug!("Step {} prompt {:?}", state.step, catalog.prompt(prompt));
        state.events.push(GameEvent::PromptChanged {
            step: state.step,
            prompt,
        });
    }

    // Spawns append to the live list; only objects that existed before this
    // frame's drain move this frame.
    let settled = state.objects.len();
    drain_spawns(state, catalog, settings, rng, dt);

    for object in &mut state.objects[..settled] {
        object.fall(dt);
    }

    prune_off_field(state, catalog);

    for effect in &mut state.effects {
        effect.age(dt);
    }
    state.effects.retain(|e| !e.is_expired());

    let step_duration = state.clock.step_duration();
    if let Some(cue) = state.cues.observe(&reading, step_duration) {
        state.events.push(cue);
    }
}

/// Drop objects that fell past the bottom edge
fn prune_off_field(state: &mut SessionState, catalog: &Catalog) {
    if !state.objects.iter().any(|o| o.is_off_field()) {
        return;
    }

    let target = state.active_prompt.and_then(|p| catalog.target_of(p));
    let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.objects)
        .into_iter()
        .partition(|o| o.is_off_field());
    state.objects = kept;

    for object in gone {
        log::trace!("Despawned {} (fell off field)", object.id);
        if Some(object.kind) == target {
            state.stats.missed_targets += 1;
        }
        state.events.push(GameEvent::ObjectDespawned {
            id: object.id,
            kind: object.kind,
        });
    }
}

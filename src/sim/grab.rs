//! Grab resolution and scoring
//!
//! A grab is judged once per object identity. Resolution runs under a
//! single-flight lock so a burst of taps arriving while one grab is being
//! judged is dropped instead of queued.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::state::{EffectMarker, GameEvent, ObjectId, SessionState};
use crate::catalog::{Catalog, Rgb};

/// Result of a grab, for feedback dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrabOutcome {
    /// Grabbed the active target; score went up
    Correct,
    /// Grabbed some other kind; object removed, no score
    Incorrect,
    /// Not judged (wrong phase, busy, stale or unknown object)
    Ignored,
}

/// Single-flight gate around grab resolution
#[derive(Debug, Default)]
pub struct GrabLock {
    busy: AtomicBool,
}

impl GrabLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock, or `None` if a grab is already being resolved
    pub fn try_acquire(&self) -> Option<GrabGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GrabGuard { lock: self })
    }

    pub fn is_held(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the grab lock on drop
#[derive(Debug)]
pub struct GrabGuard<'a> {
    lock: &'a GrabLock,
}

impl Drop for GrabGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

/// Judge a grab on `id` and apply its effects to the state.
///
/// The lock is held only for this call; feedback the host schedules from
/// the outcome runs after it is released.
pub fn resolve_grab(
    state: &mut SessionState,
    lock: &GrabLock,
    catalog: &Catalog,
    id: ObjectId,
    effect_lifetime: f64,
) -> GrabOutcome {
    if !state.phase.accepts_grabs() {
        return GrabOutcome::Ignored;
    }
    let Some(_guard) = lock.try_acquire() else {
        log::debug!("Grab on {} dropped: another grab in flight", id);
        return GrabOutcome::Ignored;
    };

    let Some(index) = state.objects.iter().position(|o| o.id == id) else {
        return GrabOutcome::Ignored;
    };
    if !state.resolved.insert(id) {
        return GrabOutcome::Ignored;
    }

    let object = state.objects.remove(index);
    let target = state.active_prompt.and_then(|p| catalog.target_of(p));

    let outcome = if target == Some(object.kind) {
        state.score += 1;
        state.stats.correct += 1;
        let color = catalog
            .kind(object.kind)
            .map(|k| k.burst_color)
            .unwrap_or(Rgb::YELLOW);
        state.effects.push(EffectMarker {
            pos: object.pos,
            color,
            ttl: effect_lifetime,
        });
        GrabOutcome::Correct
    } else {
        state.stats.incorrect += 1;
        GrabOutcome::Incorrect
    };

    log::debug!(
        "Grab {} kind {:?}: {:?} (score {})",
        id,
        object.kind,
        outcome,
        state.score
    );
    state.events.push(GameEvent::Grabbed {
        id,
        kind: object.kind,
        outcome,
    });

    outcome
}

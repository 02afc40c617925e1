//! Prompt rotation

use super::rng::RandomSource;
use crate::catalog::{Catalog, PromptId};

/// Pick a prompt uniformly, never repeating `exclude` unless it is the only one
pub fn next_prompt<R: RandomSource + ?Sized>(
    catalog: &Catalog,
    exclude: Option<PromptId>,
    rng: &mut R,
) -> PromptId {
    let candidates: Vec<PromptId> = (0..catalog.prompts().len())
        .map(PromptId)
        .filter(|id| Some(*id) != exclude)
        .collect();

    if candidates.is_empty() {
        // Single-prompt catalog
        return PromptId(rng.index(catalog.prompts().len().max(1)));
    }

    candidates[rng.index(candidates.len())]
}

//! Ranking and top-N selection.

use crate::domain::{RankedSelection, ScoreResult};

/// Ranks `results` by score descending and keeps the first `top_n`.
///
/// Ties break on ascending input index, so selection content and order
/// are deterministic for a fixed input list no matter what order the
/// scheduler completed the items in. Fewer results than `top_n` simply
/// returns them all.
#[must_use]
pub fn select(mut results: Vec<ScoreResult>, top_n: usize) -> RankedSelection {
    results.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| a.image.index.cmp(&b.image.index))
    });
    results.truncate(top_n);
    RankedSelection::new(results)
}

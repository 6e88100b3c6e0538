//! Ranked selection of scored images.

use serde::Serialize;

use super::{ImageRef, ScoreResult};

/// An ordered selection of at most N scored images.
///
/// Entries are sorted by score descending; equal scores keep ascending
/// input order. Derived once per run, after all scores are available.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedSelection {
    entries: Vec<ScoreResult>,
}

impl RankedSelection {
    /// Invariant: `entries` is already sorted and truncated by the selector.
    pub(crate) fn new(entries: Vec<ScoreResult>) -> Self {
        Self { entries }
    }

    /// Number of selected images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected entries in rank order.
    #[must_use]
    pub fn entries(&self) -> &[ScoreResult] {
        &self.entries
    }

    /// Iterates over the selected images in rank order.
    pub fn images(&self) -> impl Iterator<Item = &ImageRef> {
        self.entries.iter().map(|e| &e.image)
    }
}

impl IntoIterator for RankedSelection {
    type Item = ScoreResult;
    type IntoIter = std::vec::IntoIter<ScoreResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

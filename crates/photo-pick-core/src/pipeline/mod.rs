//! The batch scoring pipeline.
//!
//! One call to [`run`] scores every registered image through a bounded
//! worker pool, ranks the results, and returns the top-N selection.

mod scheduler;
mod select;

pub use scheduler::score_batch;
pub use select::select;

use thiserror::Error;

use crate::domain::{ImageRef, RankedSelection};
use crate::modules::{CompositeScorer, ExpressionClassifier, SharpnessConfig};
use crate::ports::ProgressSink;

/// Default worker pool width.
pub const DEFAULT_CONCURRENCY: usize = 8;
/// Default selection size.
pub const DEFAULT_TOP_N: usize = 100;

/// Structural pipeline failures.
///
/// Per-item analysis failures never surface here; they are absorbed into
/// score-0 or neutral-credit outcomes by the composite scorer.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested selection size is zero.
    #[error("top-n must be at least 1")]
    InvalidTopN,
    /// The requested worker pool width is zero.
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

/// Pipeline parameters, passed in explicitly by the caller.
#[derive(Debug, Clone)]
pub struct PickConfig {
    /// How many images to select.
    pub top_n: usize,
    /// Worker pool width for parallel scoring.
    pub concurrency: usize,
    /// Sharpness (Laplacian variance) threshold.
    pub sharpness_threshold: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            concurrency: DEFAULT_CONCURRENCY,
            sharpness_threshold: SharpnessConfig::default().threshold,
        }
    }
}

/// Scores all `images` and returns the ranked top-N selection.
///
/// An empty input yields an empty selection, not an error. Progress
/// events are emitted after each completed item, in completion order.
///
/// # Errors
///
/// Returns [`PipelineError`] if `top_n` or `concurrency` is zero.
pub fn run(
    images: &[ImageRef],
    config: &PickConfig,
    classifier: Option<&dyn ExpressionClassifier>,
    progress: &dyn ProgressSink,
) -> Result<RankedSelection, PipelineError> {
    if config.top_n == 0 {
        return Err(PipelineError::InvalidTopN);
    }
    if config.concurrency == 0 {
        return Err(PipelineError::InvalidConcurrency);
    }

    let mut scorer = CompositeScorer::new(SharpnessConfig {
        threshold: config.sharpness_threshold,
    });
    if let Some(classifier) = classifier {
        scorer = scorer.with_expression(classifier);
    }

    let results = score_batch(images, config.concurrency, progress, |image| {
        scorer.score(image)
    });

    Ok(select(results, config.top_n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NullProgress;

    #[test]
    fn test_zero_top_n_rejected() {
        let config = PickConfig {
            top_n: 0,
            ..Default::default()
        };
        let result = run(&[], &config, None, &NullProgress);
        assert!(matches!(result, Err(PipelineError::InvalidTopN)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = PickConfig {
            concurrency: 0,
            ..Default::default()
        };
        let result = run(&[], &config, None, &NullProgress);
        assert!(matches!(result, Err(PipelineError::InvalidConcurrency)));
    }

    #[test]
    fn test_empty_input_yields_empty_selection() {
        let selection = run(&[], &PickConfig::default(), None, &NullProgress).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = PickConfig::default();
        assert_eq!(config.top_n, 100);
        assert_eq!(config.concurrency, 8);
        assert!((config.sharpness_threshold - 100.0).abs() < f64::EPSILON);
    }
}

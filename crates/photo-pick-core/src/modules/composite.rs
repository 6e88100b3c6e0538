//! Composite scorer combining sharpness and expression signals.

use tracing::{debug, warn};

use crate::domain::{ExpressionOutcome, ImageRef, ScoreResult};
use crate::modules::expression::ExpressionClassifier;
use crate::modules::sharpness::{self, SharpnessConfig};

/// Scores one image at a time, absorbing every per-item failure.
///
/// The run's integrity (exactly one result per input) takes priority over
/// surfacing analysis errors: decode failures become score-0 results and
/// classifier failures become neutral credit, both recorded in the
/// [`ScoreOutcome`](crate::domain::ScoreOutcome) for diagnostics.
pub struct CompositeScorer<'a> {
    sharpness: SharpnessConfig,
    expression: Option<&'a dyn ExpressionClassifier>,
}

impl<'a> CompositeScorer<'a> {
    /// Creates a scorer with the given sharpness configuration and no
    /// expression classifier (all images get neutral expression credit).
    #[must_use]
    pub const fn new(sharpness: SharpnessConfig) -> Self {
        Self {
            sharpness,
            expression: None,
        }
    }

    /// Attaches an expression classifier.
    #[must_use]
    pub fn with_expression(mut self, classifier: &'a dyn ExpressionClassifier) -> Self {
        self.expression = Some(classifier);
        self
    }

    /// Scores a single image. Never fails; see the type-level docs for
    /// the failure-absorption policy.
    #[must_use]
    pub fn score(&self, image: &ImageRef) -> ScoreResult {
        let decoded = match image::open(&image.path) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("{}: decode failed: {e}", image.name);
                return ScoreResult::failed(image.clone(), format!("decode failed: {e}"));
            }
        };

        // The sharpness classifier expects the caller to reject degenerate
        // frames before it runs.
        if decoded.width() == 0 || decoded.height() == 0 {
            warn!("{}: degenerate dimensions", image.name);
            return ScoreResult::failed(image.clone(), "degenerate image dimensions".into());
        }

        let sharp = sharpness::is_sharp(&decoded, &self.sharpness);

        let expression = match self.expression {
            Some(classifier) => match classifier.classify(&decoded) {
                Ok(label) => ExpressionOutcome::Detected(label),
                Err(e) => {
                    warn!("{}: {} classifier failed: {e:#}", image.name, classifier.name());
                    ExpressionOutcome::Unavailable(format!("{e:#}"))
                }
            },
            None => ExpressionOutcome::Unavailable("expression classification disabled".into()),
        };

        let result = ScoreResult::scored(image.clone(), sharp, expression);
        debug!("{}: score {}", image.name, result.score());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expression, ScoreOutcome};
    use anyhow::Result;
    use image::{DynamicImage, GrayImage, Luma};
    use std::io::Write;

    struct FixedClassifier(Expression);

    impl ExpressionClassifier for FixedClassifier {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn classify(&self, _image: &DynamicImage) -> Result<Expression> {
            Ok(self.0)
        }
    }

    struct BrokenClassifier;

    impl ExpressionClassifier for BrokenClassifier {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn classify(&self, _image: &DynamicImage) -> Result<Expression> {
            anyhow::bail!("model exploded")
        }
    }

    fn save_png(dir: &tempfile::TempDir, name: &str, luma: GrayImage) -> ImageRef {
        let path = dir.path().join(name);
        DynamicImage::ImageLuma8(luma).save(&path).unwrap();
        ImageRef::new(path, 0)
    }

    fn sharp_luma() -> GrayImage {
        GrayImage::from_fn(64, 64, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }

    fn blurry_luma() -> GrayImage {
        GrayImage::from_fn(64, 64, |_, _| Luma([128u8]))
    }

    #[test]
    fn test_corrupt_file_scores_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is not a jpeg").unwrap();

        let scorer = CompositeScorer::new(SharpnessConfig::default());
        let result = scorer.score(&ImageRef::new(path, 0));

        assert_eq!(result.score(), 0);
        assert!(matches!(result.outcome, ScoreOutcome::Failed { .. }));
    }

    #[test]
    fn test_missing_file_scores_zero() {
        let scorer = CompositeScorer::new(SharpnessConfig::default());
        let result = scorer.score(&ImageRef::new("/nonexistent/photo.jpg", 0));
        assert_eq!(result.score(), 0);
    }

    #[test]
    fn test_sharp_happy_scores_three() {
        let dir = tempfile::tempdir().unwrap();
        let image = save_png(&dir, "sharp.png", sharp_luma());

        let classifier = FixedClassifier(Expression::Happy);
        let scorer = CompositeScorer::new(SharpnessConfig::default()).with_expression(&classifier);

        assert_eq!(scorer.score(&image).score(), 3);
    }

    #[test]
    fn test_blurry_neutral_scores_one() {
        let dir = tempfile::tempdir().unwrap();
        let image = save_png(&dir, "blurry.png", blurry_luma());

        let classifier = FixedClassifier(Expression::Neutral);
        let scorer = CompositeScorer::new(SharpnessConfig::default()).with_expression(&classifier);

        assert_eq!(scorer.score(&image).score(), 1);
    }

    #[test]
    fn test_classifier_failure_credits_neutral() {
        let dir = tempfile::tempdir().unwrap();
        let image = save_png(&dir, "sharp.png", sharp_luma());

        let classifier = BrokenClassifier;
        let scorer = CompositeScorer::new(SharpnessConfig::default()).with_expression(&classifier);
        let result = scorer.score(&image);

        // Sharp (+1) plus neutral credit (+1) despite the broken model.
        assert_eq!(result.score(), 2);
        let ScoreOutcome::Scored { expression, .. } = &result.outcome else {
            panic!("expected a scored outcome");
        };
        assert!(matches!(expression, ExpressionOutcome::Unavailable(_)));
    }

    #[test]
    fn test_no_classifier_credits_neutral() {
        let dir = tempfile::tempdir().unwrap();
        let image = save_png(&dir, "blurry.png", blurry_luma());

        let scorer = CompositeScorer::new(SharpnessConfig::default());
        assert_eq!(scorer.score(&image).score(), 1);
    }
}

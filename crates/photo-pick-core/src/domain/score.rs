//! Per-image scoring outcomes and the composite score.

use serde::{Deserialize, Serialize};

use super::ImageRef;

/// Dominant facial expression labels, matching the emotion model's output
/// classes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Angry.
    Angry,
    /// Disgust.
    Disgust,
    /// Fear.
    Fear,
    /// Happy.
    Happy,
    /// Sad.
    Sad,
    /// Surprise.
    Surprise,
    /// Neutral.
    Neutral,
}

impl Expression {
    /// All labels in model output order.
    pub const ALL: [Self; 7] = [
        Self::Angry,
        Self::Disgust,
        Self::Fear,
        Self::Happy,
        Self::Sad,
        Self::Surprise,
        Self::Neutral,
    ];

    /// Whether this label earns the positive-expression credit.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Happy | Self::Surprise)
    }
}

/// Result of the expression classification step for one image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionOutcome {
    /// The classifier produced a dominant label.
    Detected(Expression),
    /// The classifier failed or was disabled; credited as neutral.
    Unavailable(String),
}

/// Explicit per-item outcome of the composite scorer.
///
/// Per-item failures are recorded here instead of being swallowed, so a
/// caller can see why an image scored 0 even though failures never abort
/// the run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// Both analysis steps ran (expression possibly best-effort).
    Scored {
        /// Sharpness verdict from the focus measure.
        sharp: bool,
        /// Expression classification outcome.
        expression: ExpressionOutcome,
    },
    /// The image could not be analyzed at all (decode failure or
    /// degenerate dimensions). Scores 0.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// One image together with its scoring outcome.
///
/// Produced exactly once per input by the composite scorer, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    /// The scored image.
    pub image: ImageRef,
    /// What happened during scoring.
    pub outcome: ScoreOutcome,
}

impl ScoreResult {
    /// Creates a successful scoring result.
    #[must_use]
    pub const fn scored(image: ImageRef, sharp: bool, expression: ExpressionOutcome) -> Self {
        Self {
            image,
            outcome: ScoreOutcome::Scored { sharp, expression },
        }
    }

    /// Creates a failed (unscorable) result.
    #[must_use]
    pub const fn failed(image: ImageRef, reason: String) -> Self {
        Self {
            image,
            outcome: ScoreOutcome::Failed { reason },
        }
    }

    /// The composite score in `{0, 1, 2, 3}`.
    ///
    /// 0 = unscorable, 1 = blurry + neutral, 2 = blurry + positive or
    /// sharp + neutral, 3 = sharp + positive. An unavailable expression
    /// counts as neutral.
    #[must_use]
    pub fn score(&self) -> u8 {
        match &self.outcome {
            ScoreOutcome::Failed { .. } => 0,
            ScoreOutcome::Scored { sharp, expression } => {
                let sharpness = u8::from(*sharp);
                let expression = match expression {
                    ExpressionOutcome::Detected(label) if label.is_positive() => 2,
                    _ => 1,
                };
                sharpness + expression
            }
        }
    }

    /// Whether scoring failed outright.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, ScoreOutcome::Failed { .. })
    }
}

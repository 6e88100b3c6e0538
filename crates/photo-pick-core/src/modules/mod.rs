//! Scoring modules.
//!
//! Two independent heuristics (sharpness, facial expression) plus the
//! composite scorer that combines them into one rankable value.

mod composite;
mod expression;
mod sharpness;

pub use composite::CompositeScorer;
pub use expression::{EmotionModule, ExpressionClassifier};
pub use sharpness::{is_sharp, laplacian_variance, SharpnessConfig, DEFAULT_SHARPNESS_THRESHOLD};

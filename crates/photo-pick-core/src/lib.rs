//! Photo Pick Core - Domain logic and scoring pipeline
//!
//! This crate contains the core domain types, the sharpness and expression
//! scoring modules, the bounded parallel scheduler, and ranking/selection.

pub mod domain;
pub mod inference;
pub mod modules;
pub mod pipeline;
pub mod ports;

pub use domain::{Expression, ExpressionOutcome, ImageRef, RankedSelection, ScoreOutcome, ScoreResult};
pub use modules::{CompositeScorer, EmotionModule, ExpressionClassifier, SharpnessConfig};
pub use pipeline::{run, PickConfig, PipelineError};
pub use ports::{NullProgress, ProgressEvent, ProgressSink};

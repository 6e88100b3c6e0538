//! Core domain types for photo scoring and selection.

mod image_ref;
mod score;
mod selection;

pub use image_ref::ImageRef;
pub use score::{Expression, ExpressionOutcome, ScoreOutcome, ScoreResult};
pub use selection::RankedSelection;

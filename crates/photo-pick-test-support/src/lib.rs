//! Test support utilities for photo-pick.
//!
//! Provides synthetic image builders and mock port implementations for
//! testing the scoring pipeline without real photographs or a real
//! emotion model.

mod builders;
mod mocks;

pub use builders::SyntheticImage;
pub use mocks::{FailingClassifier, FixedClassifier, MockProgressSink};

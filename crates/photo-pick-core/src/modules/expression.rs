//! Facial-expression classification module.
//!
//! The pipeline only depends on the [`ExpressionClassifier`] trait; the
//! production implementation wraps the candle emotion network with lazy
//! weight loading.

use std::path::Path;

use anyhow::Result;
use image::DynamicImage;
use tracing::debug;

use crate::domain::Expression;
use crate::inference::{get_device, EmotionNet, LazyModel};

/// Classifies the dominant facial expression in an image.
///
/// Contract: best-effort. Implementations return their best guess even
/// when no face is clearly present; `Err` means the classifier itself
/// broke (missing weights, inference failure) and is absorbed by the
/// composite scorer as neutral credit.
pub trait ExpressionClassifier: Send + Sync {
    /// Returns the name of this classifier.
    fn name(&self) -> &'static str;

    /// Returns the dominant expression label for a decoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if classification fails.
    fn classify(&self, image: &DynamicImage) -> Result<Expression>;
}

/// Candle-backed expression classifier.
///
/// Weights load on first classification, not at construction, so a
/// missing model file degrades the run (neutral credit everywhere)
/// instead of aborting it.
pub struct EmotionModule {
    model: LazyModel<EmotionNet>,
}

impl EmotionModule {
    /// Creates the module with weights at `model_path`.
    #[must_use]
    pub fn new(model_path: impl AsRef<Path>) -> Self {
        Self {
            model: LazyModel::new(model_path, get_device(), EmotionNet::new),
        }
    }
}

impl ExpressionClassifier for EmotionModule {
    fn name(&self) -> &'static str {
        "emotion"
    }

    fn classify(&self, image: &DynamicImage) -> Result<Expression> {
        let label = self.model.get()?.dominant(image)?;
        debug!("Dominant expression: {label:?}");
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name() {
        let module = EmotionModule::new("/nonexistent/emotion.safetensors");
        assert_eq!(module.name(), "emotion");
    }

    #[test]
    fn test_missing_weights_is_error_not_panic() {
        let module = EmotionModule::new("/nonexistent/emotion.safetensors");
        let image = DynamicImage::new_luma8(48, 48);
        assert!(module.classify(&image).is_err());
    }
}

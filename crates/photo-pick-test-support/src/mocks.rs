//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use image::DynamicImage;
use photo_pick_core::{Expression, ExpressionClassifier, ProgressEvent, ProgressSink};

/// Expression classifier that always returns the same label.
pub struct FixedClassifier {
    label: Expression,
}

impl FixedClassifier {
    /// Creates a classifier returning `label` for every image.
    #[must_use]
    pub const fn new(label: Expression) -> Self {
        Self { label }
    }
}

impl ExpressionClassifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn classify(&self, _image: &DynamicImage) -> anyhow::Result<Expression> {
        Ok(self.label)
    }
}

/// Expression classifier that always fails, for exercising the
/// neutral-credit fallback path.
pub struct FailingClassifier;

impl ExpressionClassifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn classify(&self, _image: &DynamicImage) -> anyhow::Result<Expression> {
        anyhow::bail!("classifier unavailable")
    }
}

/// Progress sink that captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates an empty mock sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Scored` events.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Scored { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { total, failed } => Some((*total, *failed)),
            ProgressEvent::Scored { .. } => None,
        })
    }

    /// Fractions of all events, in arrival order.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        self.events().iter().map(ProgressEvent::fraction).collect()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_classifier() {
        let classifier = FixedClassifier::new(Expression::Happy);
        let image = DynamicImage::new_luma8(8, 8);
        assert_eq!(classifier.classify(&image).unwrap(), Expression::Happy);
    }

    #[test]
    fn test_failing_classifier() {
        let image = DynamicImage::new_luma8(8, 8);
        assert!(FailingClassifier.classify(&image).is_err());
    }

    #[test]
    fn test_mock_sink_captures_events() {
        let sink = MockProgressSink::new();
        sink.on_event(ProgressEvent::Scored {
            name: "a.jpg".into(),
            score: 3,
            completed: 1,
            total: 2,
        });
        sink.on_event(ProgressEvent::Finished { total: 2, failed: 0 });

        assert_eq!(sink.scored_count(), 1);
        assert_eq!(sink.finished_counts(), Some((2, 0)));
    }
}

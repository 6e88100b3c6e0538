//! Progress reporting port for UI integration.

/// Events emitted by the scheduler as the batch makes progress.
///
/// `Scored` events arrive in completion order, one per input;
/// `completed` increases by one each time and reaches `total` exactly
/// once, on the last item.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// One image finished scoring.
    Scored {
        /// Display name of the image.
        name: String,
        /// Composite score the image received.
        score: u8,
        /// Items completed so far, this one included.
        completed: usize,
        /// Total items submitted.
        total: usize,
    },
    /// The whole batch has been scored.
    Finished {
        /// Total items scored.
        total: usize,
        /// Items that failed analysis (score 0).
        failed: usize,
    },
}

impl ProgressEvent {
    /// Fraction of the batch completed, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        match self {
            Self::Scored { completed, total, .. } => {
                if *total == 0 {
                    1.0
                } else {
                    *completed as f64 / *total as f64
                }
            }
            Self::Finished { .. } => 1.0,
        }
    }
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Progress sink that discards all events.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_mid_batch() {
        let event = ProgressEvent::Scored {
            name: "a.jpg".into(),
            score: 2,
            completed: 5,
            total: 20,
        };
        assert!((event.fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_finished_is_one() {
        let event = ProgressEvent::Finished { total: 3, failed: 1 };
        assert!((event.fraction() - 1.0).abs() < f64::EPSILON);
    }
}

//! Bounded parallel fan-out over the input list.
//!
//! A fixed-width pool of scoped worker threads pulls images from a job
//! channel and pushes results into a completion channel. The collector
//! drains completions as they arrive, so result order is completion
//! order; ranking imposes the deterministic order afterwards.

use crossbeam_channel::unbounded;
use tracing::debug;

use crate::domain::{ImageRef, ScoreResult};
use crate::ports::{ProgressEvent, ProgressSink};

/// Scores every image through `score` using at most `concurrency` worker
/// threads, emitting one progress event per completion.
///
/// Guarantees exactly one result per input: the scoring function itself
/// never fails (failures are absorbed into score-0 outcomes), and every
/// submitted job is drained from the completion channel. Tasks share no
/// mutable state; the only serialization point is the collector loop.
pub fn score_batch<F>(
    images: &[ImageRef],
    concurrency: usize,
    progress: &dyn ProgressSink,
    score: F,
) -> Vec<ScoreResult>
where
    F: Fn(&ImageRef) -> ScoreResult + Sync,
{
    let total = images.len();
    if total == 0 {
        progress.on_event(ProgressEvent::Finished { total: 0, failed: 0 });
        return Vec::new();
    }

    let workers = concurrency.min(total);
    debug!("Scoring {total} images with {workers} workers");

    let (job_tx, job_rx) = unbounded::<&ImageRef>();
    let (done_tx, done_rx) = unbounded::<ScoreResult>();

    for image in images {
        // Receivers outlive all senders; an unbounded send cannot fail here.
        let _ = job_tx.send(image);
    }
    drop(job_tx);

    let score = &score;
    std::thread::scope(|s| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            s.spawn(move || {
                while let Ok(image) = job_rx.recv() {
                    let _ = done_tx.send(score(image));
                }
            });
        }
        // The collector must observe channel closure once the workers
        // finish, so the originals are dropped before draining.
        drop(job_rx);
        drop(done_tx);

        let mut results = Vec::with_capacity(total);
        for result in done_rx.iter() {
            progress.on_event(ProgressEvent::Scored {
                name: result.image.name.clone(),
                score: result.score(),
                completed: results.len() + 1,
                total,
            });
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        progress.on_event(ProgressEvent::Finished { total, failed });

        results
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expression, ExpressionOutcome};
    use crate::ports::NullProgress;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    fn images(count: usize) -> Vec<ImageRef> {
        (0..count)
            .map(|i| ImageRef::new(format!("img-{i}.jpg"), i))
            .collect()
    }

    /// Deterministic fake scoring keyed on the input index.
    fn fake_score(image: &ImageRef) -> ScoreResult {
        match image.index % 4 {
            0 => ScoreResult::failed(image.clone(), "decode failed".into()),
            1 => ScoreResult::scored(
                image.clone(),
                false,
                ExpressionOutcome::Detected(Expression::Neutral),
            ),
            2 => ScoreResult::scored(
                image.clone(),
                true,
                ExpressionOutcome::Detected(Expression::Neutral),
            ),
            _ => ScoreResult::scored(
                image.clone(),
                true,
                ExpressionOutcome::Detected(Expression::Happy),
            ),
        }
    }

    struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }
        fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressSink for RecordingSink {
        fn on_event(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn score_multiset(results: &[ScoreResult]) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for result in results {
            *counts.entry(result.score()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_one_result_per_input() {
        let inputs = images(20);
        let results = score_batch(&inputs, 8, &NullProgress, fake_score);
        assert_eq!(results.len(), inputs.len());

        // No input dropped or duplicated.
        let mut seen: Vec<usize> = results.iter().map(|r| r.image.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        let sink = RecordingSink::new();
        let results = score_batch(&[], 8, &sink, fake_score);
        assert!(results.is_empty());
        assert_eq!(sink.events().len(), 1);
        assert!(matches!(
            sink.events()[0],
            ProgressEvent::Finished { total: 0, failed: 0 }
        ));
    }

    #[test]
    fn test_progress_is_monotonic_and_reaches_total_once() {
        let inputs = images(12);
        let sink = RecordingSink::new();
        score_batch(&inputs, 4, &sink, fake_score);

        let completions: Vec<usize> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Scored { completed, .. } => Some(*completed),
                ProgressEvent::Finished { .. } => None,
            })
            .collect();

        assert_eq!(completions, (1..=12).collect::<Vec<_>>());
        assert_eq!(completions.iter().filter(|&&c| c == 12).count(), 1);

        let fractions: Vec<f64> = sink.events().iter().map(ProgressEvent::fraction).collect();
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert!((fractions.last().unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failures_do_not_abort_the_batch() {
        // Every 4th input "fails"; the batch still yields all results.
        let inputs = images(16);
        let sink = RecordingSink::new();
        let results = score_batch(&inputs, 8, &sink, fake_score);

        assert_eq!(results.len(), 16);
        assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 4);

        let finished = sink.events().into_iter().find_map(|e| match e {
            ProgressEvent::Finished { total, failed } => Some((total, failed)),
            ProgressEvent::Scored { .. } => None,
        });
        assert_eq!(finished, Some((16, 4)));
    }

    #[test]
    fn test_width_one_vs_width_eight_same_multiset() {
        let inputs = images(20);
        let serial = score_batch(&inputs, 1, &NullProgress, fake_score);
        let parallel = score_batch(&inputs, 8, &NullProgress, fake_score);

        assert_eq!(score_multiset(&serial), score_multiset(&parallel));
    }

    #[test]
    fn test_width_larger_than_input() {
        let inputs = images(3);
        let results = score_batch(&inputs, 64, &NullProgress, fake_score);
        assert_eq!(results.len(), 3);
    }
}

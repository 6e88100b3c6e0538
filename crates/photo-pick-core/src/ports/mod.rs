//! Port definitions between the pipeline core and its callers.

mod progress;

pub use progress::{NullProgress, ProgressEvent, ProgressSink};

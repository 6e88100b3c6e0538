//! JSON selection report adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use photo_pick_core::{RankedSelection, ScoreOutcome, ScoreResult};
use serde::Serialize;
use tracing::debug;

/// One line of the selection report.
#[derive(Serialize)]
struct ReportEntry<'a> {
    /// 1-based rank in the selection.
    rank: usize,
    /// Display name of the image.
    name: &'a str,
    /// Source path.
    path: &'a std::path::Path,
    /// Composite score (0-3).
    score: u8,
    /// Per-item scoring outcome, including absorbed failures.
    outcome: &'a ScoreOutcome,
}

impl<'a> ReportEntry<'a> {
    fn new(rank: usize, result: &'a ScoreResult) -> Self {
        Self {
            rank,
            name: &result.image.name,
            path: &result.image.path,
            score: result.score(),
            outcome: &result.outcome,
        }
    }
}

/// Full report wrapper for `--format json`.
#[derive(Serialize)]
struct Report<'a> {
    /// Run timestamp (RFC 3339).
    generated_at: String,
    /// Requested selection size.
    top_n: usize,
    /// Selected images in rank order.
    selected: Vec<ReportEntry<'a>>,
}

/// JSON output adapter for the selection report.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Writes the selection as JSON Lines, one entry per image.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_entries(&self, selection: &RankedSelection) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        for (i, result) in selection.entries().iter().enumerate() {
            let json = serde_json::to_string(&ReportEntry::new(i + 1, result))?;
            writeln!(writer, "{json}")?;
        }
        Ok(())
    }

    /// Writes the selection as a single report object.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_report(
        &self,
        selection: &RankedSelection,
        top_n: usize,
        pretty: bool,
    ) -> Result<()> {
        let report = Report {
            generated_at: iso_timestamp(),
            top_n,
            selected: selection
                .entries()
                .iter()
                .enumerate()
                .map(|(i, r)| ReportEntry::new(i + 1, r))
                .collect(),
        };

        let json = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    /// Flushes the underlying writer.
    #[allow(clippy::significant_drop_tightening)]
    pub fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

//! Pick command - score a batch of photos and select the top N.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photo_pick_adapters::{collect_image_refs, materialize, ModelStore};
use photo_pick_core::{
    pipeline, EmotionModule, ExpressionClassifier, PickConfig,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for the selection report.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per selected image)
    #[default]
    Jsonl,
    /// Single JSON report object
    Json,
}

/// Hardcoded default values.
mod defaults {
    pub const TOP_N: usize = photo_pick_core::pipeline::DEFAULT_TOP_N;
    pub const CONCURRENCY: usize = photo_pick_core::pipeline::DEFAULT_CONCURRENCY;
    pub const SHARPNESS_THRESHOLD: f64 = photo_pick_core::modules::DEFAULT_SHARPNESS_THRESHOLD;
}

/// Shared arguments for scoring and selection.
#[derive(Args, Clone)]
pub struct PickArgs {
    /// Files or directories containing the photos to score
    pub paths: Vec<PathBuf>,

    /// How many top photos to select
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Worker pool width for parallel scoring
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Sharpness (Laplacian variance) threshold
    #[arg(long)]
    pub sharpness_threshold: Option<f64>,

    /// Copy the selected photos into this directory
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Disable expression classification (neutral credit for every image)
    #[arg(long)]
    pub no_expression: bool,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl PickArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Expression: CLI --no-expression always wins; config can disable
        // only when the flag wasn't passed.
        if !args.no_expression {
            if let Some(enabled) = config.pick.expression {
                args.no_expression = !enabled;
            }
        }

        args.top_n = args.top_n.or(config.pick.top_n);
        args.concurrency = args.concurrency.or(config.pick.concurrency);
        args.sharpness_threshold = args
            .sharpness_threshold
            .or(config.pick.sharpness_threshold);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        args.config = Some(config.clone());
        args
    }

    fn top_n(&self) -> usize {
        self.top_n.unwrap_or(defaults::TOP_N)
    }

    fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(defaults::CONCURRENCY)
    }

    fn sharpness_threshold(&self) -> f64 {
        self.sharpness_threshold
            .unwrap_or(defaults::SHARPNESS_THRESHOLD)
    }

    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the pick command.
pub struct PickResult {
    /// Number of images scored.
    pub scored: usize,
    /// Number of images selected.
    pub selected: usize,
    /// Number of files written (0 when no output directory was given).
    pub written: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the pick command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &PickArgs) -> Result<PickResult> {
    info!("Running pick command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let images = collect_image_refs(&args.paths, args.recursive);
    let total = images.len();

    let classifier = build_classifier(args);
    let classifier_ref: Option<&dyn ExpressionClassifier> =
        classifier.as_ref().map(|c| c as &dyn ExpressionClassifier);

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total as u64, args.quiet, show_progress);

    let config = PickConfig {
        top_n: args.top_n(),
        concurrency: args.concurrency(),
        sharpness_threshold: args.sharpness_threshold(),
    };

    let selection = pipeline::run(&images, &config, classifier_ref, &progress_bar)
        .context("Scoring pipeline failed")?;

    // Report on stdout
    let output = JsonOutput::stdout();
    match args.format() {
        OutputFormat::Jsonl => output.write_entries(&selection)?,
        OutputFormat::Json => output.write_report(&selection, config.top_n, args.pretty)?,
    }
    output.flush()?;

    // Materialize into the output directory, if requested
    let written = match args.output_dir {
        Some(ref dest) => {
            let written = materialize(&selection, dest)
                .with_context(|| format!("Failed to materialize into {}", dest.display()))?;
            info!("Wrote {} files to {}", written.len(), dest.display());
            written.len()
        }
        None => 0,
    };

    Ok(PickResult {
        scored: total,
        selected: selection.len(),
        written,
        exit_code: ExitCode::Success,
    })
}

/// Build the expression classifier unless disabled or missing its model.
fn build_classifier(args: &PickArgs) -> Option<EmotionModule> {
    if args.no_expression {
        debug!("Expression classification disabled");
        return None;
    }

    let store = ModelStore::new(args.models_dir.clone());
    let path = store.model_path("emotion")?;
    if !path.exists() {
        warn!(
            "Expression classification disabled: {} not found. Run `photo-pick models fetch`.",
            path.display()
        );
        return None;
    }

    debug!("Using emotion model at {}", path.display());
    Some(EmotionModule::new(path))
}

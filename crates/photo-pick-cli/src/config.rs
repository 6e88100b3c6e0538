//! Configuration file support for photo-pick.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-pick/config.toml` (lowest priority)
//! - Project-local: `.photo-pick.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Scoring and selection settings.
    pub pick: PickSection,
    /// Model settings.
    pub models: ModelsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Scoring and selection configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PickSection {
    /// How many photos to select.
    pub top_n: Option<usize>,
    /// Worker pool width.
    pub concurrency: Option<usize>,
    /// Sharpness (Laplacian variance) threshold.
    pub sharpness_threshold: Option<f64>,
    /// Enable/disable expression classification.
    pub expression: Option<bool>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-pick/config.toml`
    /// 2. Project-local: `.photo-pick.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(n) = self.pick.top_n {
            if n == 0 {
                return Err("pick.top_n must be at least 1".into());
            }
        }
        if let Some(c) = self.pick.concurrency {
            if c == 0 {
                return Err("pick.concurrency must be at least 1".into());
            }
        }
        if let Some(t) = self.pick.sharpness_threshold {
            if t < 0.0 {
                return Err(format!("pick.sharpness_threshold must be >= 0, got {t}"));
            }
        }
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!("output.format must be 'json' or 'jsonl', got '{f}'"));
            }
        }
        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.pick.top_n = other.pick.top_n.or(self.pick.top_n);
        self.pick.concurrency = other.pick.concurrency.or(self.pick.concurrency);
        self.pick.sharpness_threshold = other
            .pick
            .sharpness_threshold
            .or(self.pick.sharpness_threshold);
        self.pick.expression = other.pick.expression.or(self.pick.expression);

        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-pick").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.photo-pick.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".photo-pick.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = AppConfig::default();
        assert!(config.pick.top_n.is_none());
        assert!(config.pick.concurrency.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r"
            [general]
            recursive = true

            [pick]
            top_n = 50
            concurrency = 4
            sharpness_threshold = 120.0
            expression = false

            [output]
            format = 'json'
            pretty = true
            ",
        )
        .unwrap();

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(config.pick.top_n, Some(50));
        assert_eq!(config.pick.concurrency, Some(4));
        assert_eq!(config.pick.expression, Some(false));
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base: AppConfig = toml::from_str("[pick]\ntop_n = 10").unwrap();
        let project: AppConfig = toml::from_str("[pick]\ntop_n = 25").unwrap();
        base.merge(project);
        assert_eq!(base.pick.top_n, Some(25));
    }

    #[test]
    fn test_merge_keeps_base_when_other_missing() {
        let mut base: AppConfig = toml::from_str("[pick]\nconcurrency = 2").unwrap();
        base.merge(AppConfig::default());
        assert_eq!(base.pick.concurrency, Some(2));
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let config: AppConfig = toml::from_str("[pick]\ntop_n = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let config: AppConfig = toml::from_str("[output]\nformat = 'xml'").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".photo-pick.toml"), "[pick]\ntop_n = 5").unwrap();

        let found = find_config_in_parents(&nested).unwrap();
        assert_eq!(found, dir.path().join(".photo-pick.toml"));
    }
}

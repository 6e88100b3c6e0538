//! Emotion model downloading and caching.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Download URL (GitHub releases).
    pub url: &'static str,
    /// Expected SHA256 hash. Set to all zeros to skip verification during development.
    pub sha256: &'static str,
    /// Filename in models directory.
    pub filename: &'static str,
}

/// Known models.
pub const MODELS: &[ModelInfo] = &[ModelInfo {
    name: "emotion",
    url: "https://github.com/photo-pick/photo-pick/releases/download/models-v1/emotion.safetensors",
    sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: real hash once models-v1 is published
    filename: "emotion.safetensors",
}];

/// Handle to the on-disk model cache.
///
/// The directory is fixed at construction (CLI `--models-dir` / config,
/// falling back to the platform data directory), so callers thread the
/// choice through explicitly instead of mutating process state.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Creates a store rooted at `dir`, or at
    /// `XDG_DATA_HOME/photo-pick/models` (`~/.local/share/photo-pick/models`)
    /// when no override is given.
    #[must_use]
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("photo-pick")
                .join("models")
        });
        Self { dir }
    }

    /// Returns the models directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures all required models are downloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the models directory cannot be created, a
    /// download fails, or a checksum doesn't match.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create models directory")?;

        for model in MODELS {
            let path = self.dir.join(model.filename);
            if path.exists() {
                debug!("Model {} already exists", model.name);
            } else {
                download_model(model, &path)?;
            }
        }

        Ok(())
    }

    /// Returns the path to a specific model file.
    #[must_use]
    pub fn model_path(&self, name: &str) -> Option<PathBuf> {
        MODELS
            .iter()
            .find(|m| m.name == name)
            .map(|m| self.dir.join(m.filename))
    }

    /// Lists known models with their installed status.
    #[must_use]
    pub fn list(&self) -> Vec<(String, bool)> {
        MODELS
            .iter()
            .map(|m| (m.name.to_string(), self.dir.join(m.filename).exists()))
            .collect()
    }
}

/// Downloads a model from its URL.
fn download_model(model: &ModelInfo, path: &Path) -> Result<()> {
    info!("Downloading model: {}", model.name);

    let response = reqwest::blocking::get(model.url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read response for {}", model.name))?;

    if model.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            model.name
        );
    } else {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != model.sha256 {
            anyhow::bail!(
                "Checksum mismatch for {}: expected {}, got {}. \
                 Try deleting {} and re-running to download a fresh copy.",
                model.name,
                model.sha256,
                hash,
                path.display()
            );
        }
    }

    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", model.name))?;

    info!("Downloaded {} ({} bytes)", model.name, bytes.len());
    Ok(())
}

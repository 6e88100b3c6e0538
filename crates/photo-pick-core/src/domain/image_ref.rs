//! Input image handles.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A stable handle to one input image.
///
/// Created once when a file is registered with the pipeline and read-only
/// thereafter. `index` records the registration order and serves as the
/// deterministic tie-break key during ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRef {
    /// Path to the image file.
    pub path: PathBuf,
    /// Display name, derived from the original filename.
    pub name: String,
    /// Position in the input list (0-based registration order).
    pub index: usize,
}

impl ImageRef {
    /// Creates a handle for the file at `path`, registered at `index`.
    ///
    /// The display name is the file name component of the path; paths
    /// without one (e.g. `..`) fall back to a positional name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, index: usize) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| format!("image-{index}"), |n| n.to_string_lossy().into_owned());
        Self { path, name, index }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

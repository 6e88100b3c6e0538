//! Filesystem adapters: input discovery and output materialization.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use photo_pick_core::{ImageRef, RankedSelection};
use tracing::{debug, warn};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Collects image files from the given paths into registration order.
///
/// Files are registered in the order given; directory entries are sorted
/// by name so registration indices (the ranking tie-break key) are
/// reproducible across runs. Unsupported or missing paths are warned
/// about and skipped, not treated as errors.
#[must_use]
pub fn collect_image_refs(paths: &[PathBuf], recursive: bool) -> Vec<ImageRef> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                files.push(path.clone());
            } else {
                warn!("Unsupported file type: {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_dir(path, recursive, &mut files);
        } else {
            warn!("Path does not exist: {}", path.display());
        }
    }

    debug!("Found {} image files", files.len());

    files
        .into_iter()
        .enumerate()
        .map(|(index, path)| ImageRef::new(path, index))
        .collect()
}

fn collect_from_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        } else if path.is_dir() && recursive {
            collect_from_dir(&path, recursive, files);
        }
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Copies the selected files into `dest` in selection order.
///
/// Display-name collisions get a numeric suffix (`name-1.jpg`) instead
/// of overwriting an earlier pick. Returns the written paths, in
/// selection order.
///
/// # Errors
///
/// Any single write failure fails the whole operation: unlike scoring,
/// this indicates a storage problem, not a bad input. Files written
/// before the failure may already exist.
pub fn materialize(selection: &RankedSelection, dest: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create output directory: {}", dest.display()))?;

    let mut written = Vec::with_capacity(selection.len());

    for image in selection.images() {
        let target = unique_target(dest, &image.name);
        std::fs::copy(&image.path, &target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                image.path.display(),
                target.display()
            )
        })?;
        debug!("Wrote {}", target.display());
        written.push(target);
    }

    Ok(written)
}

/// First non-colliding path for `name` under `dest`.
fn unique_target(dest: &Path, name: &str) -> PathBuf {
    let candidate = dest.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    for i in 1.. {
        let disambiguated = match ext {
            Some(ext) => dest.join(format!("{stem}-{i}.{ext}")),
            None => dest.join(format!("{name}-{i}")),
        };
        if !disambiguated.exists() {
            return disambiguated;
        }
    }
    unreachable!("suffix search is unbounded")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.JPEG")));
        assert!(is_supported_image(Path::new("test.png")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    #[test]
    fn test_collect_assigns_sequential_indices() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.jpg", "c.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let refs = collect_image_refs(&[dir.path().to_path_buf()], false);

        // Sorted directory order, text file skipped.
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.png"]);
        let indices: Vec<usize> = refs.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_collect_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("sub/nested.jpg"), b"x").unwrap();

        let flat = collect_image_refs(&[dir.path().to_path_buf()], false);
        assert_eq!(flat.len(), 1);

        let deep = collect_image_refs(&[dir.path().to_path_buf()], true);
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_unique_target_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_target(dir.path(), "a.jpg"), dir.path().join("a.jpg"));

        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        assert_eq!(
            unique_target(dir.path(), "a.jpg"),
            dir.path().join("a-1.jpg")
        );

        std::fs::write(dir.path().join("a-1.jpg"), b"x").unwrap();
        assert_eq!(
            unique_target(dir.path(), "a.jpg"),
            dir.path().join("a-2.jpg")
        );
    }

    #[test]
    fn test_unique_target_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo"), b"x").unwrap();
        assert_eq!(
            unique_target(dir.path(), "photo"),
            dir.path().join("photo-1")
        );
    }
}

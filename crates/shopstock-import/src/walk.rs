//! Recursive discovery-root walk producing root-relative file paths.

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::IMAGE_EXTENSIONS;
use crate::ImportError;

/// Walks `root` recursively and returns the relative paths of all image
/// files (jpg/jpeg/png/webp), sorted by path for a deterministic listing.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if a directory cannot be read.
pub fn walk_image_files(root: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();
    walk_dir(root, Path::new(""), &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> Result<(), ImportError> {
    let dir = root.join(relative);
    let entries = fs::read_dir(&dir).map_err(|source| ImportError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ImportError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let rel = relative.join(entry.file_name());
        let file_type = entry.file_type().map_err(|source| ImportError::Io {
            path: root.join(&rel).display().to_string(),
            source,
        })?;

        if file_type.is_dir() {
            walk_dir(root, &rel, files)?;
        } else if is_image_file(&rel) {
            files.push(rel);
        }
    }

    Ok(())
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extension_filter_is_case_insensitive() {
        assert!(is_image_file(Path::new("a/b.JPG")));
        assert!(is_image_file(Path::new("a/b.webp")));
        assert!(!is_image_file(Path::new("a/b.txt")));
        assert!(!is_image_file(Path::new("a/noext")));
    }
}

//! Ordering of image files within one color bucket or the common bucket.
//!
//! The order decides both display `sort_order` and which file becomes a
//! bucket's first (primary-candidate) image.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Sorts image files in place: `-main.` files first, then files with a
/// trailing numeric suffix in ascending numeric order, then everything else
/// case-insensitively by name. A file with a numeric suffix sorts before a
/// file without one.
pub fn sort_image_files(files: &mut [PathBuf]) {
    files.sort_by(|a, b| compare_files(a, b));
}

fn compare_files(a: &Path, b: &Path) -> Ordering {
    let name_a = lower_file_name(a);
    let name_b = lower_file_name(b);

    let main_a = is_main_file(&name_a);
    let main_b = is_main_file(&name_b);
    if main_a != main_b {
        return if main_a { Ordering::Less } else { Ordering::Greater };
    }

    match (numeric_suffix(&name_a), numeric_suffix(&name_b)) {
        (Some(na), Some(nb)) => na.cmp(&nb).then_with(|| name_a.cmp(&name_b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => name_a.cmp(&name_b),
    }
}

fn lower_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// A `-main.` marker anywhere in the (lowercased) filename flags the bucket's
/// designated lead image.
fn is_main_file(lower_name: &str) -> bool {
    lower_name.contains("-main.")
}

/// Trailing digit run immediately before the extension, e.g. `x-10.jpg` → 10.
fn numeric_suffix(lower_name: &str) -> Option<u64> {
    let stem = lower_name.rsplit_once('.').map_or(lower_name, |(s, _)| s);
    let digits: String = stem
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

//! Union of CSV-declared and filesystem-discovered images for one product.

use std::collections::BTreeMap;

use shopstock_core::ImageSource;

use crate::classify::DiscoveredImageSet;
use crate::rows::ImageRow;

/// A CSV-declared image entry for one product, already stripped of its
/// product reference.
#[derive(Debug, Clone)]
pub struct CsvImageSeed {
    pub source: ImageSource,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
    pub is_primary: bool,
}

impl From<ImageRow> for CsvImageSeed {
    fn from(row: ImageRow) -> Self {
        CsvImageSeed {
            source: row.source,
            color: row.color,
            sort_order: row.sort_order,
            is_primary: row.is_primary,
        }
    }
}

/// Merged image buckets for one product. CSV entries come first in every
/// bucket; the hero can only come from discovery.
#[derive(Debug, Clone, Default)]
pub struct MergedImages {
    pub hero: Option<ImageSource>,
    pub common: Vec<ImageSource>,
    pub by_color: BTreeMap<String, Vec<ImageSource>>,
}

/// Merges CSV-declared seeds with discovered images.
///
/// CSV seeds are ordered primary-first then by `sort_order` and seeded
/// before discovered entries, so CSV wins on conflicting metadata for the
/// same filename. Deduplication is by case-insensitive filename, per
/// bucket for common and across all color buckets. A filename present in
/// both the common bucket and a color bucket is excluded from common —
/// the color-specific classification wins.
#[must_use]
pub fn merge_images(seeds: &[CsvImageSeed], discovered: &DiscoveredImageSet) -> MergedImages {
    let mut ordered = seeds.to_vec();
    ordered.sort_by_key(|s| (!s.is_primary, s.sort_order.unwrap_or(i32::MAX)));

    let mut common: Vec<ImageSource> = Vec::new();
    let mut by_color: BTreeMap<String, Vec<ImageSource>> = BTreeMap::new();

    for seed in ordered {
        match &seed.color {
            Some(color) => add_to_bucket(&mut by_color, color, seed.source.clone()),
            None => add_unique(&mut common, seed.source.clone()),
        }
    }

    for path in &discovered.common {
        add_unique(&mut common, ImageSource::Local(path.clone()));
    }
    for (color, files) in &discovered.by_color {
        for path in files {
            add_to_bucket(&mut by_color, color, ImageSource::Local(path.clone()));
        }
    }

    // Color classification wins over common for the same filename.
    let color_names: Vec<String> = by_color
        .values()
        .flatten()
        .map(|s| s.file_name().to_lowercase())
        .collect();
    common.retain(|s| !color_names.contains(&s.file_name().to_lowercase()));

    MergedImages {
        hero: discovered.hero.clone().map(ImageSource::Local),
        common,
        by_color,
    }
}

/// Appends `source` unless its filename is already present (case-insensitive).
fn add_unique(bucket: &mut Vec<ImageSource>, source: ImageSource) {
    let name = source.file_name().to_lowercase();
    if !bucket
        .iter()
        .any(|existing| existing.file_name().to_lowercase() == name)
    {
        bucket.push(source);
    }
}

/// Appends `source` to the (case-insensitively matched) color bucket unless
/// the filename already lives in any color bucket. The first bucket key
/// form seen is kept, so CSV spelling wins over discovered spelling.
fn add_to_bucket(
    by_color: &mut BTreeMap<String, Vec<ImageSource>>,
    color: &str,
    source: ImageSource,
) {
    let name = source.file_name().to_lowercase();
    if by_color
        .values()
        .flatten()
        .any(|existing| existing.file_name().to_lowercase() == name)
    {
        return;
    }

    let key = by_color
        .keys()
        .find(|k| k.eq_ignore_ascii_case(color))
        .cloned()
        .unwrap_or_else(|| color.to_string());
    by_color.entry(key).or_default().push(source);
}

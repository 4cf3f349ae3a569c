//! Primary-image selection, color display order, and the ordered upload plan.

use shopstock_core::{CatalogImage, ImageSource};

use crate::merge::MergedImages;

/// One entry of a product's ordered upload plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub source: ImageSource,
    /// Bucket the image belongs to; `None` for hero/common.
    pub color: Option<String>,
}

/// Resolves the display order of a product's colors.
///
/// Base order is CSV-declared colors in file order followed by
/// discovered-only colors alphabetically, deduplicated case-insensitively
/// keeping the first occurrence. An explicit `primary_color` present in the
/// order moves to the front; otherwise "Black" (case-insensitive) moves to
/// the front when present.
#[must_use]
pub fn color_display_order(
    csv_colors: &[String],
    discovered_colors: &[String],
    primary_color: Option<&str>,
) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut discovered_sorted = discovered_colors.to_vec();
    discovered_sorted.sort_by_key(|c| c.to_lowercase());

    for color in csv_colors.iter().chain(discovered_sorted.iter()) {
        if !order.iter().any(|c| c.eq_ignore_ascii_case(color)) {
            order.push(color.clone());
        }
    }

    let front = primary_color
        .and_then(|wanted| order.iter().position(|c| c.eq_ignore_ascii_case(wanted)))
        .or_else(|| order.iter().position(|c| c.eq_ignore_ascii_case("black")));
    if let Some(at) = front {
        let color = order.remove(at);
        order.insert(0, color);
    }

    order
}

/// Builds the ordered upload plan: hero, then common, then each color in
/// display order with its bucket files in sorter order. A filename already
/// planned is skipped wherever it is re-encountered.
///
/// The first plan entry that resolves successfully becomes the product's
/// primary image, so this ordering is exactly the primary-selection
/// precedence: hero, else first common, else first image of the first
/// display color.
#[must_use]
pub fn image_plan(merged: &MergedImages, color_order: &[String]) -> Vec<PlannedImage> {
    let mut plan: Vec<PlannedImage> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    let mut push = |plan: &mut Vec<PlannedImage>,
                    seen: &mut Vec<String>,
                    source: &ImageSource,
                    color: Option<&str>| {
        let name = source.file_name().to_lowercase();
        if seen.contains(&name) {
            return;
        }
        seen.push(name);
        plan.push(PlannedImage {
            source: source.clone(),
            color: color.map(ToString::to_string),
        });
    };

    if let Some(hero) = &merged.hero {
        push(&mut plan, &mut seen, hero, None);
    }
    for source in &merged.common {
        push(&mut plan, &mut seen, source, None);
    }
    for color in color_order {
        let Some((key, files)) = merged
            .by_color
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(color))
        else {
            continue;
        };
        for source in files {
            push(&mut plan, &mut seen, source, Some(key));
        }
    }

    plan
}

/// Accumulates successfully resolved images into persistable records.
///
/// The running sort counter starts at 1 and advances only on success, and
/// the first recorded image is the primary one. Skipped plan entries
/// (e.g. missing local files) leave both untouched, which is how primary
/// selection falls through hero → common → first color.
#[derive(Debug, Default)]
pub struct ImageRecorder {
    records: Vec<CatalogImage>,
}

impl ImageRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one uploaded image under its final public URL.
    pub fn record(&mut self, planned: &PlannedImage, url: String) {
        let is_primary = self.records.is_empty();
        let sort_order = i32::try_from(self.records.len()).unwrap_or(i32::MAX - 1) + 1;
        self.records.push(CatalogImage {
            url,
            is_primary,
            sort_order,
            color: planned.color.clone(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<CatalogImage> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn colors(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn black_moves_to_front_without_explicit_primary() {
        let order = color_display_order(&[], &colors(&["White", "Ultramarine", "Black"]), None);
        assert_eq!(order, ["Black", "Ultramarine", "White"]);
    }

    #[test]
    fn explicit_primary_color_overrides_black() {
        let order = color_display_order(
            &[],
            &colors(&["White", "Ultramarine", "Black"]),
            Some("Ultramarine"),
        );
        assert_eq!(order, ["Ultramarine", "White", "Black"]);
    }

    #[test]
    fn unknown_primary_color_falls_back_to_black() {
        let order = color_display_order(&[], &colors(&["Black", "Teal"]), Some("Crimson"));
        assert_eq!(order, ["Black", "Teal"]);
    }

    #[test]
    fn csv_order_precedes_discovered_alphabetical() {
        let order = color_display_order(
            &colors(&["Teal", "Pink"]),
            &colors(&["White", "Ultramarine"]),
            Some("Teal"),
        );
        assert_eq!(order, ["Teal", "Pink", "Ultramarine", "White"]);
    }

    #[test]
    fn display_order_dedupes_case_insensitively() {
        let order = color_display_order(&colors(&["black"]), &colors(&["Black", "Teal"]), None);
        assert_eq!(order, ["black", "Teal"]);
    }

    fn local(name: &str) -> ImageSource {
        ImageSource::Local(PathBuf::from(name))
    }

    fn merged_fixture() -> MergedImages {
        let mut merged = MergedImages {
            hero: Some(local("iph16-main_main.jpg")),
            common: vec![local("iph16-common-1.jpg")],
            ..MergedImages::default()
        };
        merged
            .by_color
            .insert("Black".to_string(), vec![local("iph16-black-1.jpg")]);
        merged
            .by_color
            .insert("Teal".to_string(), vec![local("iph16-teal-1.jpg")]);
        merged
    }

    #[test]
    fn plan_orders_hero_common_then_colors() {
        let plan = image_plan(&merged_fixture(), &colors(&["Black", "Teal"]));
        let names: Vec<String> = plan.iter().map(|p| p.source.file_name()).collect();
        assert_eq!(
            names,
            [
                "iph16-main_main.jpg",
                "iph16-common-1.jpg",
                "iph16-black-1.jpg",
                "iph16-teal-1.jpg"
            ]
        );
        assert_eq!(plan[0].color, None);
        assert_eq!(plan[2].color.as_deref(), Some("Black"));
    }

    #[test]
    fn plan_skips_duplicate_filenames() {
        let mut merged = merged_fixture();
        merged
            .by_color
            .get_mut("Black")
            .unwrap()
            .insert(0, local("iph16-common-1.jpg"));
        let plan = image_plan(&merged, &colors(&["Black"]));
        let names: Vec<String> = plan.iter().map(|p| p.source.file_name()).collect();
        assert_eq!(
            names,
            ["iph16-main_main.jpg", "iph16-common-1.jpg", "iph16-black-1.jpg"]
        );
    }

    #[test]
    fn plan_follows_color_display_order() {
        let plan = image_plan(&merged_fixture(), &colors(&["Teal", "Black"]));
        let names: Vec<String> = plan.iter().map(|p| p.source.file_name()).collect();
        assert_eq!(names[2], "iph16-teal-1.jpg");
        assert_eq!(names[3], "iph16-black-1.jpg");
    }

    #[test]
    fn recorder_marks_first_success_primary() {
        let plan = image_plan(&merged_fixture(), &colors(&["Black", "Teal"]));
        let mut recorder = ImageRecorder::new();
        // Hero fails to resolve (missing local file): skipped, no record.
        recorder.record(&plan[1], "https://cdn.example.com/common-1.jpg".to_string());
        recorder.record(&plan[2], "https://cdn.example.com/black-1.jpg".to_string());
        let records = recorder.finish();
        assert!(records[0].is_primary);
        assert!(!records[1].is_primary);
        assert_eq!(records[0].sort_order, 1);
        assert_eq!(records[1].sort_order, 2);
    }

    #[test]
    fn recorder_empty_set_has_no_primary() {
        let records = ImageRecorder::new().finish();
        assert!(records.iter().all(|r| !r.is_primary));
        assert!(records.is_empty());
    }

    #[test]
    fn exactly_one_primary_across_records() {
        let plan = image_plan(&merged_fixture(), &colors(&["Black", "Teal"]));
        let mut recorder = ImageRecorder::new();
        for (idx, planned) in plan.iter().enumerate() {
            recorder.record(planned, format!("https://cdn.example.com/{idx}.jpg"));
        }
        let records = recorder.finish();
        assert_eq!(records.iter().filter(|r| r.is_primary).count(), 1);
    }
}

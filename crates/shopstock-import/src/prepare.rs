//! End-to-end assembly of grouped rows, discovered images, and upload plans.

use std::path::PathBuf;

use shopstock_core::CatalogProduct;

use crate::classify::{classify_images, resolve_strategy, ClassifierConfig};
use crate::group::{expand_skus, group_rows};
use crate::merge::{merge_images, CsvImageSeed};
use crate::resolve::{color_display_order, image_plan, PlannedImage};
use crate::rows::{CatalogRow, ImageRow};

/// One fully normalized product, ready for the orchestrator.
#[derive(Debug, Clone)]
pub struct PreparedProduct {
    pub product: CatalogProduct,
    /// Colors in display order; governs SKU expansion and image appending.
    pub color_order: Vec<String>,
    /// Ordered upload plan; the first entry to resolve becomes primary.
    pub plan: Vec<PlannedImage>,
}

/// Runs the full normalization pipeline over catalog rows, image rows, and
/// the discovery-root listing, yielding one [`PreparedProduct`] per logical
/// product in file order.
///
/// Image rows referencing a public ID no catalog row produces are logged
/// and dropped.
#[must_use]
pub fn prepare_products(
    config: &ClassifierConfig,
    rows: Vec<CatalogRow>,
    image_rows: &[ImageRow],
    listing: &[PathBuf],
) -> Vec<PreparedProduct> {
    let groups = group_rows(rows);

    let known_ids: Vec<&str> = groups.iter().map(|g| g.public_id.as_str()).collect();
    for row in image_rows {
        if !known_ids.contains(&row.product_public_id.as_str()) {
            tracing::warn!(
                product = %row.product_public_id,
                file = %row.source.file_name(),
                "image row references unknown product; dropping"
            );
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let strategy = resolve_strategy(config, &group.public_id, Some(&group.title));
            let discovered = classify_images(config, &strategy, listing);

            let seeds: Vec<CsvImageSeed> = image_rows
                .iter()
                .filter(|r| r.product_public_id == group.public_id)
                .cloned()
                .map(CsvImageSeed::from)
                .collect();
            let merged = merge_images(&seeds, &discovered);

            let color_order = color_display_order(
                &group.csv_colors,
                &discovered.discovered_colors(),
                group.primary_color.as_deref(),
            );
            let plan = image_plan(&merged, &color_order);
            let skus = expand_skus(&group, &color_order);

            PreparedProduct {
                product: group.into_product(skus),
                color_order,
                plan,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopstock_core::{AttributeMap, Condition, Price};

    use super::*;

    fn row(public_id: &str, title: &str, colors: &[&str]) -> CatalogRow {
        CatalogRow {
            brand: "Apple".to_string(),
            category: "Smartphones".to_string(),
            family: Some("iPhone".to_string()),
            model: Some("16".to_string()),
            variant: None,
            title: title.to_string(),
            description: None,
            published: true,
            public_id: Some(public_id.to_string()),
            colors: colors.iter().map(ToString::to_string).collect(),
            primary_color: None,
            condition: Condition::New,
            price: Price {
                currency_code: "USD".to_string(),
                amount: Decimal::new(79_900, 2),
                discount: None,
            },
            quantity: 1,
            attributes: AttributeMap::new(),
        }
    }

    fn listing(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn prepares_a_product_end_to_end() {
        let config = ClassifierConfig::default();
        let prepared = prepare_products(
            &config,
            vec![row("IPH16-PRO", "Apple iPhone 16 Pro", &["Black"])],
            &[],
            &listing(&[
                "iph16pro-main_main.jpg",
                "iph16pro-common-1.jpg",
                "iph16pro-black-1.jpg",
                "iph16pro-desert-titanium-1.jpg",
            ]),
        );
        assert_eq!(prepared.len(), 1);
        let p = &prepared[0];
        // CSV Black first, then discovered Desert Titanium; Black stays in
        // front via the default preference.
        assert_eq!(p.color_order, ["Black", "Desert Titanium"]);
        // One SKU per color in the union.
        assert_eq!(p.product.skus.len(), 2);
        // hero, common, black, desert titanium.
        let names: Vec<String> = p.plan.iter().map(|pl| pl.source.file_name()).collect();
        assert_eq!(
            names,
            [
                "iph16pro-main_main.jpg",
                "iph16pro-common-1.jpg",
                "iph16pro-black-1.jpg",
                "iph16pro-desert-titanium-1.jpg"
            ]
        );
    }

    #[test]
    fn pipeline_is_deterministic_across_runs() {
        let config = ClassifierConfig::default();
        let files = listing(&["iph16pro-black-2.jpg", "iph16pro-black-1.jpg"]);
        let run = || {
            prepare_products(
                &config,
                vec![row("IPH16-PRO", "Apple iPhone 16 Pro", &["Black"])],
                &[],
                &files,
            )
        };
        let a = run();
        let b = run();
        let codes = |p: &PreparedProduct| {
            p.product
                .skus
                .iter()
                .map(|s| s.sku_code.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(codes(&a[0]), codes(&b[0]));
        assert_eq!(a[0].plan, b[0].plan);
    }

    #[test]
    fn csv_image_rows_seed_the_plan() {
        let config = ClassifierConfig::default();
        let prepared = prepare_products(
            &config,
            vec![row("IPH16-PRO", "Apple iPhone 16 Pro", &[])],
            &[ImageRow {
                product_public_id: "IPH16-PRO".to_string(),
                source: shopstock_core::ImageSource::from_field(
                    "https://cdn.example.com/studio.jpg",
                ),
                is_primary: false,
                sort_order: None,
                color: None,
            }],
            &listing(&["iph16pro-common-1.jpg"]),
        );
        let names: Vec<String> = prepared[0]
            .plan
            .iter()
            .map(|pl| pl.source.file_name())
            .collect();
        assert_eq!(names, ["studio.jpg", "iph16pro-common-1.jpg"]);
    }

    #[test]
    fn products_without_images_still_expand_skus() {
        let config = ClassifierConfig::default();
        let prepared = prepare_products(
            &config,
            vec![row("GALAXY-S24", "Samsung Galaxy S24", &["Onyx"])],
            &[],
            &[],
        );
        assert!(prepared[0].plan.is_empty());
        assert_eq!(prepared[0].product.skus.len(), 1);
    }
}

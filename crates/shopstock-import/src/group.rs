//! Grouping of flat CSV rows into logical products and SKU expansion.

use std::collections::HashMap;

use shopstock_core::{generate_public_id, generate_sku_code, CatalogProduct, CatalogSku};

use crate::rows::CatalogRow;

/// One logical product assembled from all CSV rows sharing a grouping key.
#[derive(Debug, Clone)]
pub struct ProductGroup {
    pub brand: String,
    pub category: String,
    pub family: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    pub public_id: String,
    pub primary_color: Option<String>,
    /// Colors declared across the group's rows, in file order, deduplicated.
    pub csv_colors: Vec<String>,
    pub rows: Vec<CatalogRow>,
}

impl ProductGroup {
    /// Builds the persistable product record with its expanded SKU set.
    #[must_use]
    pub fn into_product(self, skus: Vec<CatalogSku>) -> CatalogProduct {
        CatalogProduct {
            brand: self.brand,
            category: self.category,
            family: self.family,
            model: self.model,
            variant: self.variant,
            title: self.title,
            description: self.description,
            published: self.published,
            public_id: self.public_id,
            skus,
        }
    }
}

/// Groups flat CSV rows into products keyed on
/// brand + category + family + model + variant + title (exact match).
/// Group order follows first appearance in the file.
#[must_use]
pub fn group_rows(rows: Vec<CatalogRow>) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = group_key(&row);
        if let Some(&at) = index.get(&key) {
            merge_into_group(&mut groups[at], row);
        } else {
            index.insert(key, groups.len());
            groups.push(new_group(row));
        }
    }

    groups
}

fn group_key(row: &CatalogRow) -> String {
    [
        row.brand.as_str(),
        row.category.as_str(),
        row.family.as_deref().unwrap_or_default(),
        row.model.as_deref().unwrap_or_default(),
        row.variant.as_deref().unwrap_or_default(),
        row.title.as_str(),
    ]
    .join("\u{1f}")
}

fn new_group(row: CatalogRow) -> ProductGroup {
    let public_id = row.public_id.clone().unwrap_or_else(|| {
        generate_public_id(
            row.family.as_deref(),
            row.model.as_deref(),
            row.variant.as_deref(),
            &row.title,
        )
    });

    ProductGroup {
        brand: row.brand.clone(),
        category: row.category.clone(),
        family: row.family.clone(),
        model: row.model.clone(),
        variant: row.variant.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        published: row.published,
        public_id,
        primary_color: row.primary_color.clone(),
        csv_colors: row.colors.clone(),
        rows: vec![row],
    }
}

fn merge_into_group(group: &mut ProductGroup, row: CatalogRow) {
    if group.description.is_none() {
        group.description.clone_from(&row.description);
    }
    if group.primary_color.is_none() {
        group.primary_color.clone_from(&row.primary_color);
    }
    for color in &row.colors {
        if !group
            .csv_colors
            .iter()
            .any(|c| c.eq_ignore_ascii_case(color))
        {
            group.csv_colors.push(color.clone());
        }
    }
    group.rows.push(row);
}

/// Expands a group's rows into SKUs across the merged color set.
///
/// Every color in `colors` (the CSV ∪ discovered union) gets one SKU per
/// row, even when it has zero images. With an empty color set each row
/// yields a single colorless SKU. Duplicate SKU codes keep the first
/// occurrence.
#[must_use]
pub fn expand_skus(group: &ProductGroup, colors: &[String]) -> Vec<CatalogSku> {
    let mut skus: Vec<CatalogSku> = Vec::new();

    for row in &group.rows {
        let color_slots: Vec<Option<&str>> = if colors.is_empty() {
            vec![None]
        } else {
            colors.iter().map(|c| Some(c.as_str())).collect()
        };

        for color in color_slots {
            let mut attributes = row.attributes.clone();
            if let Some(color) = color {
                attributes.insert("color".to_string(), color.to_string());
            }
            let sku_code = generate_sku_code(&group.public_id, row.condition, &attributes);
            if skus.iter().any(|s| s.sku_code == sku_code) {
                continue;
            }
            skus.push(CatalogSku {
                sku_code,
                condition: row.condition,
                attributes,
                is_active: true,
                price: row.price.clone(),
                quantity: row.quantity,
            });
        }
    }

    skus
}

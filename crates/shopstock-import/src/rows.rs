//! CSV row schemas for the catalog and image input files.
//!
//! Raw serde rows are validated into typed rows at read time so parse
//! failures carry the 1-based CSV line they came from.

use rust_decimal::Decimal;
use serde::Deserialize;
use shopstock_core::{AttributeMap, Condition, Discount, ImageSource, Price};

use crate::ImportError;

/// Columns that feed SKU attributes, copied verbatim when present.
const ATTRIBUTE_COLUMNS: [&str; 4] = ["storage", "ram", "chip_tier", "connectivity"];

#[derive(Debug, Deserialize)]
struct RawCatalogRow {
    brand: String,
    category: String,
    title: String,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    public_id: Option<String>,
    #[serde(default)]
    colors_list: Option<String>,
    #[serde(default)]
    primary_color: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    discount_percent: Option<Decimal>,
    #[serde(default)]
    discount_amount: Option<Decimal>,
    #[serde(default)]
    quantity: Option<i32>,
    #[serde(default)]
    storage: Option<String>,
    #[serde(default)]
    ram: Option<String>,
    #[serde(default)]
    chip_tier: Option<String>,
    #[serde(default)]
    connectivity: Option<String>,
}

/// One validated catalog CSV row. Each row describes a product (columns
/// repeated across its rows) plus one SKU dimension.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub brand: String,
    pub category: String,
    pub family: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    /// Explicit public ID override; generated from name parts when absent.
    pub public_id: Option<String>,
    /// Colors declared in the `colors_list` column, in file order.
    pub colors: Vec<String>,
    pub primary_color: Option<String>,
    pub condition: Condition,
    pub price: Price,
    pub quantity: i32,
    /// Non-color attribute dimensions declared on this row.
    pub attributes: AttributeMap,
}

#[derive(Debug, Deserialize)]
struct RawImageRow {
    product_public_id: String,
    file_or_url: String,
    #[serde(default)]
    is_primary: Option<String>,
    #[serde(default)]
    sort_order: Option<i32>,
    #[serde(default)]
    color: Option<String>,
}

/// One validated image CSV row.
#[derive(Debug, Clone)]
pub struct ImageRow {
    pub product_public_id: String,
    pub source: ImageSource,
    /// Marks this row as the preferred seed within its bucket.
    pub is_primary: bool,
    pub sort_order: Option<i32>,
    /// `None` seeds the common bucket.
    pub color: Option<String>,
}

/// Reads and validates catalog rows from CSV input.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] on malformed CSV and
/// [`ImportError::InvalidRow`] when a row fails validation (bad condition,
/// missing price, both discount modes set, negative quantity).
pub fn read_catalog_rows(reader: impl std::io::Read) -> Result<Vec<CatalogRow>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<RawCatalogRow>().enumerate() {
        // +2: 1-based, after the header row.
        let line = idx as u64 + 2;
        let raw = record?;
        rows.push(validate_catalog_row(raw, line)?);
    }
    Ok(rows)
}

/// Reads and validates image rows from CSV input.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] on malformed CSV and
/// [`ImportError::InvalidRow`] when `file_or_url` is empty.
pub fn read_image_rows(reader: impl std::io::Read) -> Result<Vec<ImageRow>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<RawImageRow>().enumerate() {
        let line = idx as u64 + 2;
        let raw = record?;
        if raw.file_or_url.is_empty() {
            return Err(ImportError::InvalidRow {
                line,
                reason: "file_or_url must be non-empty".to_string(),
            });
        }
        rows.push(ImageRow {
            product_public_id: raw.product_public_id,
            source: ImageSource::from_field(&raw.file_or_url),
            is_primary: raw.is_primary.as_deref().map(parse_bool).unwrap_or(false),
            sort_order: raw.sort_order,
            color: raw.color.filter(|c| !c.is_empty()),
        });
    }
    Ok(rows)
}

fn validate_catalog_row(raw: RawCatalogRow, line: u64) -> Result<CatalogRow, ImportError> {
    if raw.brand.is_empty() || raw.category.is_empty() || raw.title.is_empty() {
        return Err(ImportError::InvalidRow {
            line,
            reason: "brand, category, and title must be non-empty".to_string(),
        });
    }

    let condition = match raw.condition.as_deref() {
        None => Condition::New,
        Some(value) => Condition::parse(value).ok_or_else(|| ImportError::InvalidRow {
            line,
            reason: format!("unknown condition '{value}'"),
        })?,
    };

    let amount = raw.price.ok_or_else(|| ImportError::InvalidRow {
        line,
        reason: "price must be set".to_string(),
    })?;

    let discount = match (raw.discount_percent, raw.discount_amount) {
        (Some(_), Some(_)) => {
            return Err(ImportError::InvalidRow {
                line,
                reason: "discount_percent and discount_amount are mutually exclusive".to_string(),
            })
        }
        (Some(percent), None) => Some(Discount::Percent(percent)),
        (None, Some(amount)) => Some(Discount::Amount(amount)),
        (None, None) => None,
    };

    let quantity = raw.quantity.unwrap_or(0);
    if quantity < 0 {
        return Err(ImportError::InvalidRow {
            line,
            reason: format!("quantity must be non-negative, got {quantity}"),
        });
    }

    let mut attributes = AttributeMap::new();
    let declared = [&raw.storage, &raw.ram, &raw.chip_tier, &raw.connectivity];
    for (key, value) in ATTRIBUTE_COLUMNS.iter().zip(declared) {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            attributes.insert((*key).to_string(), value.to_string());
        }
    }

    Ok(CatalogRow {
        brand: raw.brand,
        category: raw.category,
        family: raw.family.filter(|s| !s.is_empty()),
        model: raw.model.filter(|s| !s.is_empty()),
        variant: raw.variant.filter(|s| !s.is_empty()),
        title: raw.title,
        description: raw.description.filter(|s| !s.is_empty()),
        published: raw.published.as_deref().map(parse_bool).unwrap_or(true),
        public_id: raw.public_id.filter(|s| !s.is_empty()),
        colors: parse_colors_list(raw.colors_list.as_deref().unwrap_or_default()),
        primary_color: raw.primary_color.filter(|s| !s.is_empty()),
        condition,
        price: Price {
            currency_code: raw
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "USD".to_string()),
            amount,
            discount,
        },
        quantity,
        attributes,
    })
}

/// Splits a semicolon-separated color list, preserving file order and
/// dropping case-insensitive duplicates.
pub(crate) fn parse_colors_list(value: &str) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for part in value.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !seen.iter().any(|c| c.eq_ignore_ascii_case(part)) {
            seen.push(part.to_string());
        }
    }
    seen
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [&str; 21] = [
        "brand",
        "category",
        "family",
        "model",
        "variant",
        "title",
        "description",
        "published",
        "public_id",
        "colors_list",
        "primary_color",
        "condition",
        "currency",
        "price",
        "discount_percent",
        "discount_amount",
        "quantity",
        "storage",
        "ram",
        "chip_tier",
        "connectivity",
    ];

    /// Builds a one-row CSV document; unnamed columns stay empty.
    fn csv_with_row(overrides: &[(&str, &str)]) -> String {
        let row = COLUMNS
            .iter()
            .map(|col| {
                overrides
                    .iter()
                    .find(|(k, _)| k == col)
                    .map_or("", |(_, v)| *v)
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{}\n{row}\n", COLUMNS.join(","))
    }

    fn parse_one(overrides: &[(&str, &str)]) -> Result<Vec<CatalogRow>, ImportError> {
        read_catalog_rows(csv_with_row(overrides).as_bytes())
    }

    const BASE: &[(&str, &str)] = &[
        ("brand", "Apple"),
        ("category", "Smartphones"),
        ("title", "Apple iPhone 16"),
        ("price", "799.00"),
    ];

    fn with_base(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut all = BASE.to_vec();
        all.extend_from_slice(extra);
        all
    }

    #[test]
    fn reads_a_full_row() {
        let rows = parse_one(&[
            ("brand", "Apple"),
            ("category", "Smartphones"),
            ("family", "iPhone"),
            ("model", "16"),
            ("variant", "Pro"),
            ("title", "Apple iPhone 16 Pro"),
            ("description", "Nice phone"),
            ("published", "true"),
            ("public_id", "IPH16-PRO"),
            ("colors_list", "Black;Desert Titanium"),
            ("condition", "new"),
            ("currency", "USD"),
            ("price", "999.00"),
            ("quantity", "5"),
            ("storage", "256GB"),
            ("ram", "8GB"),
        ])
        .expect("row should parse");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.brand, "Apple");
        assert_eq!(row.public_id.as_deref(), Some("IPH16-PRO"));
        assert_eq!(row.colors, ["Black", "Desert Titanium"]);
        assert_eq!(row.condition, Condition::New);
        assert_eq!(row.quantity, 5);
        assert_eq!(row.attributes.get("storage").map(String::as_str), Some("256GB"));
        assert_eq!(row.attributes.get("ram").map(String::as_str), Some("8GB"));
        assert!(!row.attributes.contains_key("chip_tier"));
    }

    #[test]
    fn published_defaults_to_true() {
        let rows = parse_one(BASE).expect("row should parse");
        assert!(rows[0].published);
    }

    #[test]
    fn missing_price_is_an_error() {
        let err = parse_one(&[
            ("brand", "Apple"),
            ("category", "Smartphones"),
            ("title", "Apple iPhone 16"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn both_discount_modes_is_an_error() {
        let err = parse_one(&with_base(&[
            ("discount_percent", "10"),
            ("discount_amount", "50.00"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ImportError::InvalidRow { ref reason, .. } if reason.contains("mutually exclusive"))
        );
    }

    #[test]
    fn single_discount_mode_is_accepted() {
        let rows =
            parse_one(&with_base(&[("discount_percent", "10")])).expect("row should parse");
        assert!(matches!(rows[0].price.discount, Some(Discount::Percent(_))));
    }

    #[test]
    fn negative_quantity_is_an_error() {
        let err = parse_one(&with_base(&[("quantity", "-3")])).unwrap_err();
        assert!(
            matches!(err, ImportError::InvalidRow { ref reason, .. } if reason.contains("non-negative"))
        );
    }

    #[test]
    fn unknown_condition_is_an_error() {
        let err = parse_one(&with_base(&[("condition", "refurbished")])).unwrap_err();
        assert!(
            matches!(err, ImportError::InvalidRow { ref reason, .. } if reason.contains("refurbished"))
        );
    }

    #[test]
    fn colors_list_dedupes_case_insensitively() {
        assert_eq!(
            parse_colors_list("Black; black ;Teal;;BLACK"),
            ["Black", "Teal"]
        );
    }

    #[test]
    fn currency_defaults_to_usd() {
        let rows = parse_one(BASE).expect("row should parse");
        assert_eq!(rows[0].price.currency_code, "USD");
    }

    #[test]
    fn reads_image_rows() {
        let csv = "product_public_id,file_or_url,is_primary,sort_order,color\n\
IPH16,https://cdn.example.com/iph16-black.jpg,true,1,Black\n\
IPH16,iph16-common-1.jpg,,,\n";
        let rows = read_image_rows(csv.as_bytes()).expect("rows should parse");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_primary);
        assert_eq!(rows[0].color.as_deref(), Some("Black"));
        assert!(matches!(rows[0].source, ImageSource::Remote(_)));
        assert!(!rows[1].is_primary);
        assert!(rows[1].color.is_none());
        assert!(matches!(rows[1].source, ImageSource::Local(_)));
    }

    #[test]
    fn empty_file_or_url_is_an_error() {
        let csv = "product_public_id,file_or_url,is_primary,sort_order,color\nIPH16,,,,\n";
        let err = read_image_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { line: 2, .. }));
    }
}

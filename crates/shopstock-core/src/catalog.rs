//! Normalized catalog records produced by the import pipeline, ready for
//! persistence.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SKU attribute name → value mapping (e.g. `color`, `storage`).
///
/// Declaration order is irrelevant; SKU code generation imposes its own
/// fixed key order.
pub type AttributeMap = BTreeMap<String, String>;

/// Condition of a purchasable variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    SecondHand,
}

impl Condition {
    /// Storage representation used in database rows.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::SecondHand => "second_hand",
        }
    }

    /// Tag embedded in generated SKU codes.
    #[must_use]
    pub fn code_tag(self) -> &'static str {
        match self {
            Condition::New => "NEW",
            Condition::SecondHand => "USED",
        }
    }

    /// Parses a condition from CSV input. `"used"` is accepted as an alias
    /// for `"second_hand"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Condition> {
        match s.trim().to_lowercase().as_str() {
            "new" | "" => Some(Condition::New),
            "second_hand" | "used" => Some(Condition::SecondHand),
            _ => None,
        }
    }
}

/// Discount applied to a SKU price. Only one mode can be active at a time;
/// the enum makes the exclusivity structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    Percent(Decimal),
    Amount(Decimal),
}

/// Price record for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// ISO 4217 currency code (e.g. `"USD"`).
    pub currency_code: String,
    pub amount: Decimal,
    pub discount: Option<Discount>,
}

/// One purchasable variant of a [`CatalogProduct`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSku {
    /// Stable unique key, derived from the product public ID, condition,
    /// and attributes.
    pub sku_code: String,
    pub condition: Condition,
    pub attributes: AttributeMap,
    pub is_active: bool,
    pub price: Price,
    /// Non-negative inventory quantity.
    pub quantity: i32,
}

/// Where an image's bytes come from: a path relative to the import images
/// root, or a remote URL fetched over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

impl ImageSource {
    /// Classifies a CSV `file_or_url` value.
    #[must_use]
    pub fn from_field(value: &str) -> ImageSource {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Remote(trimmed.to_string())
        } else {
            ImageSource::Local(PathBuf::from(trimmed))
        }
    }

    /// Final path segment, used for deduplication and storage keys.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            ImageSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ImageSource::Remote(url) => url
                .rsplit('/')
                .next()
                .map(|s| s.split(['?', '#']).next().unwrap_or(s))
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// A persisted product image row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogImage {
    /// Public URL (or local relative path, for stores that serve files
    /// directly).
    pub url: String,
    pub is_primary: bool,
    /// Display order, assigned by the importer's running counter.
    pub sort_order: i32,
    /// `None` means the image is common to every color variant.
    pub color: Option<String>,
}

/// A logical product, pre-upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub brand: String,
    pub category: String,
    pub family: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub published: bool,
    /// Stable uppercase slug; the upsert idempotency key.
    pub public_id: String,
    pub skus: Vec<CatalogSku>,
}

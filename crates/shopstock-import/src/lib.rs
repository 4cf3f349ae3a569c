//! Catalog normalization pipeline: CSV row grouping, filesystem image
//! discovery and classification, merge, and primary-image resolution.
//!
//! Everything in this crate is pure apart from [`walk::walk_image_files`];
//! the classifier and resolver operate on relative-path listings so they can
//! be tested without touching a real filesystem.

pub mod classify;
pub mod error;
pub mod group;
pub mod merge;
pub mod prepare;
pub mod resolve;
pub mod rows;
pub mod sort;
pub mod walk;

pub use classify::{
    classify_images, resolve_strategy, ClassifierConfig, DiscoveredImageSet, NameStrategy,
};
pub use error::ImportError;
pub use group::{expand_skus, group_rows, ProductGroup};
pub use merge::{merge_images, CsvImageSeed, MergedImages};
pub use prepare::{prepare_products, PreparedProduct};
pub use resolve::{color_display_order, image_plan, ImageRecorder, PlannedImage};
pub use rows::{read_catalog_rows, read_image_rows, CatalogRow, ImageRow};
pub use sort::sort_image_files;
pub use walk::walk_image_files;

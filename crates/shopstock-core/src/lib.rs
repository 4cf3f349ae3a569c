pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;

pub use app_config::AppConfig;
pub use catalog::{
    AttributeMap, CatalogImage, CatalogProduct, CatalogSku, Condition, Discount, ImageSource,
    Price,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use ids::{generate_public_id, generate_sku_code, slugify};

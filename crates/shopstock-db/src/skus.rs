//! Database operations for `skus`, `prices`, and `inventory`.

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use shopstock_core::{CatalogSku, Discount};

use crate::DbError;

/// Upserts a SKU row keyed on its generated `sku_code`.
///
/// Conflicts update `product_id`, `condition`, `attributes`, `is_active`,
/// and `updated_at` in place. Attributes are stored as a `jsonb` object.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_sku(pool: &PgPool, product_id: i64, sku: &CatalogSku) -> Result<i64, DbError> {
    let attributes = json!(sku.attributes);

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO skus (sku_code, product_id, condition, attributes, is_active) \
         VALUES ($1, $2, $3, $4::jsonb, $5) \
         ON CONFLICT (sku_code) DO UPDATE SET \
             product_id = EXCLUDED.product_id, \
             condition  = EXCLUDED.condition, \
             attributes = EXCLUDED.attributes, \
             is_active  = EXCLUDED.is_active, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(&sku.sku_code)
    .bind(product_id)
    .bind(sku.condition.as_str())
    .bind(attributes)
    .bind(sku.is_active)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Upserts the current price for a SKU.
///
/// One price row per SKU; conflicts on `sku_id` replace the amount, currency,
/// and discount. The discount's two modes land in mutually exclusive
/// `discount_percent` / `discount_amount` columns.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_price(pool: &PgPool, sku_id: i64, sku: &CatalogSku) -> Result<(), DbError> {
    let (discount_percent, discount_amount): (Option<Decimal>, Option<Decimal>) =
        match sku.price.discount {
            Some(Discount::Percent(p)) => (Some(p), None),
            Some(Discount::Amount(a)) => (None, Some(a)),
            None => (None, None),
        };

    sqlx::query(
        "INSERT INTO prices (sku_id, currency_code, amount, discount_percent, discount_amount) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (sku_id) DO UPDATE SET \
             currency_code    = EXCLUDED.currency_code, \
             amount           = EXCLUDED.amount, \
             discount_percent = EXCLUDED.discount_percent, \
             discount_amount  = EXCLUDED.discount_amount, \
             updated_at       = NOW()",
    )
    .bind(sku_id)
    .bind(&sku.price.currency_code)
    .bind(sku.price.amount)
    .bind(discount_percent)
    .bind(discount_amount)
    .execute(pool)
    .await?;

    Ok(())
}

/// Upserts the on-hand quantity for a SKU.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_inventory(pool: &PgPool, sku_id: i64, quantity: i32) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO inventory (sku_id, quantity) \
         VALUES ($1, $2) \
         ON CONFLICT (sku_id) DO UPDATE SET \
             quantity   = EXCLUDED.quantity, \
             updated_at = NOW()",
    )
    .bind(sku_id)
    .bind(quantity)
    .execute(pool)
    .await?;

    Ok(())
}

//! Database operations for the `products` table.

use sqlx::PgPool;

use shopstock_core::CatalogProduct;

use crate::DbError;

/// Upserts a product row keyed on its `public_id`.
///
/// Conflicts update `brand_id`, `category_id`, the descriptive fields, and
/// `updated_at` in place, so re-running an import with edited catalog data
/// never duplicates a product.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(
    pool: &PgPool,
    brand_id: i64,
    category_id: i64,
    product: &CatalogProduct,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (public_id, brand_id, category_id, family, model, variant, title, \
              description, published) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (public_id) DO UPDATE SET \
             brand_id    = EXCLUDED.brand_id, \
             category_id = EXCLUDED.category_id, \
             family      = EXCLUDED.family, \
             model       = EXCLUDED.model, \
             variant     = EXCLUDED.variant, \
             title       = EXCLUDED.title, \
             description = EXCLUDED.description, \
             published   = EXCLUDED.published, \
             updated_at  = NOW() \
         RETURNING id",
    )
    .bind(&product.public_id)
    .bind(brand_id)
    .bind(category_id)
    .bind(&product.family)
    .bind(&product.model)
    .bind(&product.variant)
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.published)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

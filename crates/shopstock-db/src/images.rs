//! Database operations for the `product_images` table.

use sqlx::PgPool;

use shopstock_core::CatalogImage;

use crate::DbError;

/// Replaces the full image set for a product.
///
/// Deletes existing rows for the product and inserts the new set in order.
/// The delete and inserts run as separate statements, not one transaction;
/// a crash mid-way leaves a partial image set that the next run repairs.
///
/// Returns the number of inserted rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn replace_product_images(
    pool: &PgPool,
    product_id: i64,
    images: &[CatalogImage],
) -> Result<usize, DbError> {
    sqlx::query("DELETE FROM product_images WHERE product_id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;

    for image in images {
        sqlx::query(
            "INSERT INTO product_images (product_id, url, is_primary, sort_order, color) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(image.is_primary)
        .bind(image.sort_order)
        .bind(&image.color)
        .execute(pool)
        .await?;
    }

    Ok(images.len())
}

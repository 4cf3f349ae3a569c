//! Database operations for the `brands` table.

use sqlx::PgPool;

use crate::DbError;

/// Upserts a brand by slug and returns its internal `id`.
///
/// Conflicts on `slug` update `name` and `updated_at` in place, so renaming
/// a brand in the catalog file propagates without creating a duplicate row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_brand(pool: &PgPool, name: &str, slug: &str) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO brands (name, slug) \
         VALUES ($1, $2) \
         ON CONFLICT (slug) DO UPDATE SET \
             name       = EXCLUDED.name, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

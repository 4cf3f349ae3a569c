//! Database operations for the `categories` table.

use sqlx::PgPool;

use crate::DbError;

/// Upserts a category by slug and returns its internal `id`.
///
/// Conflicts on `slug` update `name` and `updated_at` in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_category(pool: &PgPool, name: &str, slug: &str) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, slug) \
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

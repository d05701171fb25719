//! PostgreSQL pool construction
//!
//! Every pool shares the same settings: a bounded connection count and an
//! acquire timeout, so a stalled database turns into a 500 instead of a hung
//! request.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool size when `database.max_connections` is not configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect with the default pool size.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/lumiere").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Connect eagerly so an unreachable database fails at startup.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    pool_options(max_connections).connect(database_url).await
}

/// Build a pool that opens connections on first use.
pub fn create_lazy_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    pool_options(max_connections).connect_lazy(database_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    const CLOSED_PORT: &str = "postgres://lumiere@127.0.0.1:1/lumiere";

    #[tokio::test]
    async fn lazy_pool_opens_nothing_upfront() {
        let pool = create_lazy_pool(CLOSED_PORT, 3).unwrap();
        assert_eq!(pool.size(), 0);
        assert_eq!(pool.options().get_max_connections(), 3);
        assert_eq!(pool.options().get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn schema_tables_are_queryable() {
        let pool = test_pool().await;
        for table in ["photos", "categories", "photo_categories", "awards"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert!(count >= 0, "{table}");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn parallel_category_lookups_share_the_pool() {
        let pool = test_pool().await;

        let lookups: Vec<_> = (0..DEFAULT_MAX_CONNECTIONS * 2)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    crate::db::CategoryRepo::new(&pool).list(None).await.is_ok()
                })
            })
            .collect();

        for lookup in lookups {
            assert!(lookup.await.unwrap());
        }
        assert!(pool.size() <= DEFAULT_MAX_CONNECTIONS);
    }
}

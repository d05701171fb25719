//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an explicit limit - no Arc<Mutex<Connection>>
//! - Photo reads aggregate categories, quotes and media in one query
//! - Rely on DB constraints for uniqueness, map SQLSTATE to domain errors
//! - Transactions only where a step must not be half-applied

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_options};
pub use repos::*;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::PgPool;

    /// Connect to `DATABASE_URL` and make sure the schema exists.
    pub async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = super::create_pool(&url).await.expect("pool creation failed");
        super::migrations::run(&pool).await.expect("migrations failed");
        pool
    }
}

// src/config/db.rs
// DOCUMENTATION: Database connection pool lifecycle
// PURPOSE: Create the PostgreSQL pool, prepare the schema, close on shutdown

use crate::config::Config;
use crate::db::ensure_schema;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Recycle idle connections after 5 minutes, all connections after 30
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
}

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Called once during startup in main.rs. Connects, verifies
/// the connection and creates or alters the tables before any request is
/// served. The returned pool is handed to every handler through web::Data.
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "Initializing database pool (max {} connections)",
        config.db_max_connections
    );

    let pool = pool_options(config).connect(&config.database_url).await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    ensure_schema(&pool).await?;

    log::info!("Database pool initialized and schema ready");
    Ok(pool)
}

/// Close all pooled connections after the HTTP server has stopped
pub async fn close_db_pool(pool: PgPool) {
    log::info!("Closing database pool");
    pool.close().await;
}

/// Pool that never connects until a query runs; handler tests use it to
/// prove a request was rejected before touching the database
#[cfg(test)]
pub fn lazy_test_pool(config: &Config) -> PgPool {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .expect("test database url parses")
}

/// Pool bound to a fresh, empty schema of `DATABASE_URL`; None when the
/// variable is unset. Used by the `#[ignore]` tests that need real rows.
#[cfg(test)]
pub async fn scratch_schema_pool() -> Option<PgPool> {
    use sqlx::postgres::PgConnectOptions;
    use std::str::FromStr;

    let url = std::env::var("DATABASE_URL").ok()?;
    let schema = format!("test_{}", uuid::Uuid::new_v4().simple());

    let admin = PgPool::connect(&url).await.expect("test database reachable");
    sqlx::query(&format!("CREATE SCHEMA {}", schema))
        .execute(&admin)
        .await
        .expect("scratch schema created");
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .expect("test database url parses")
        .options([("search_path", schema.as_str())]);

    Some(
        PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("scratch pool connects"),
    )
}

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::{info, warn};

/// Creates the report table, optionally dropping it first.
///
/// `reset` reproduces the legacy cold-start sequence: an unconditional
/// `DROP TABLE report` with no `IF EXISTS` guard, so startup aborts when
/// the table is absent. It destroys every previously stored row.
pub async fn initialize_schema(pool: &MySqlPool, reset: bool) -> Result<()> {
    info!("Initializing database schema...");

    if reset {
        warn!("DB_RESET_ON_START is set: dropping report table, all rows will be lost");
        sqlx::query("DROP TABLE report")
            .execute(pool)
            .await
            .context("failed to drop report table")?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS report (
            pk MEDIUMINT NOT NULL AUTO_INCREMENT,
            id VARCHAR(20) NOT NULL,
            result TEXT,
            report_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (pk)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create report table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

pub mod schema;

use anyhow::{Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::config::{parse_host_port, Config};

// Permanent connections kept in the pool.
const POOL_SIZE: u32 = 5;
// Temporary connections allowed beyond POOL_SIZE.
const MAX_OVERFLOW: u32 = 2;
const ACQUIRE_TIMEOUT_SECS: u64 = 30;
const MAX_LIFETIME_SECS: u64 = 1800;

/// Builds the connection pool from configuration.
///
/// Dials TCP when `DB_HOST` is set, otherwise connects through the
/// Cloud SQL proxy unix socket. Any failure here is fatal; the caller
/// exits before serving traffic.
pub async fn create_pool(config: &Config) -> Result<MySqlPool> {
    let connect_options = build_connect_options(config)?;

    let pool = MySqlPoolOptions::new()
        .min_connections(POOL_SIZE)
        .max_connections(POOL_SIZE + MAX_OVERFLOW)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .max_lifetime(Duration::from_secs(MAX_LIFETIME_SECS))
        .connect_with(connect_options)
        .await
        .context("failed to establish database connection pool")?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("database connection test query failed")?;
    log::info!("database connection test successful");

    Ok(pool)
}

fn build_connect_options(config: &Config) -> Result<MySqlConnectOptions> {
    let options = MySqlConnectOptions::new()
        .username(&config.db_user)
        .password(&config.db_pass)
        .database(&config.db_name);

    match &config.db_host {
        Some(addr) => {
            let (host, port) = parse_host_port(addr)?;
            log::info!(
                "connecting over TCP (password hidden): mysql://{}:***@{}:{}/{}",
                config.db_user,
                host,
                port,
                config.db_name
            );
            Ok(options.host(&host).port(port))
        }
        None => {
            let instance = config
                .cloud_sql_connection_name
                .as_deref()
                .context("CLOUD_SQL_CONNECTION_NAME is required when DB_HOST is not set")?;
            let socket = Path::new(&config.db_socket_path).join(instance);
            log::info!(
                "connecting over unix socket (password hidden): mysql://{}:***@{}/{}",
                config.db_user,
                socket.display(),
                config.db_name
            );
            Ok(options.socket(socket))
        }
    }
}

use anyhow::{bail, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    /// `host:port` of the database server. When set, the pool dials TCP;
    /// when unset, the pool connects through a unix socket (Cloud SQL proxy).
    pub db_host: Option<String>,
    pub db_socket_path: String,
    pub cloud_sql_connection_name: Option<String>,
    pub port: u16,
    pub db_reset_on_start: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self {
            db_user: env::var("DB_USER").context("DB_USER environment variable is required")?,
            db_pass: env::var("DB_PASS").context("DB_PASS environment variable is required")?,
            db_name: env::var("DB_NAME").context("DB_NAME environment variable is required")?,
            db_host: env::var("DB_HOST").ok(),
            db_socket_path: env::var("DB_SOCKET_PATH")
                .unwrap_or_else(|_| "/cloudsql".to_string()),
            cloud_sql_connection_name: env::var("CLOUD_SQL_CONNECTION_NAME").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT environment variable must be a valid port number")?,
            db_reset_on_start: env::var("DB_RESET_ON_START")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        if config.db_user.is_empty() {
            bail!("DB_USER environment variable must not be empty");
        }
        if config.db_name.is_empty() {
            bail!("DB_NAME environment variable must not be empty");
        }

        // Fail at startup rather than on the first connection attempt.
        if let Some(host) = &config.db_host {
            parse_host_port(host)?;
        } else if config.cloud_sql_connection_name.is_none() {
            bail!("CLOUD_SQL_CONNECTION_NAME environment variable is required when DB_HOST is not set");
        }

        Ok(config)
    }
}

/// Splits a `host:port` address into its parts. The port segment is mandatory.
pub fn parse_host_port(addr: &str) -> Result<(String, u16)> {
    let (host, port) = addr
        .split_once(':')
        .with_context(|| format!("DB_HOST '{}' is missing a port segment", addr))?;
    if host.is_empty() {
        bail!("DB_HOST '{}' is missing a host segment", addr);
    }
    let port: u16 = port
        .parse()
        .with_context(|| format!("DB_HOST '{}' has an invalid port segment", addr))?;
    Ok((host.to_string(), port))
}

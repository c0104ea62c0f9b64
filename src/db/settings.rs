use figment::{Figment, providers::Env};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

use crate::error::ServiceError;

const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Connection settings for the relational store.
///
/// Read from the environment on every connection attempt, never cached, so a
/// credential rotation takes effect on the next reconnect.
#[derive(Debug, Deserialize)]
pub struct DbSettings {
    pub db_user: String,
    pub db_password: String,
    /// Hostname, optionally with a `:port` suffix.
    pub db_host: String,
    pub db_name: String,
}

impl DbSettings {
    /// Extract `DB_USER`, `DB_PASSWORD`, `DB_HOST` and `DB_NAME` from the
    /// current process environment. A missing variable is a configuration
    /// error.
    pub fn from_env() -> Result<Self, ServiceError> {
        let settings = Figment::new()
            .merge(Env::raw().only(&["db_user", "db_password", "db_host", "db_name"]))
            .extract()?;
        Ok(settings)
    }

    /// Connect options targeting `user:password@host/dbname`, with the fixed
    /// session options the service has always used: utf8mb4 charset and the
    /// server's system time zone. Time values decode via chrono.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let (host, port) = split_host_port(&self.db_host);
        MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .charset("utf8mb4")
            .timezone(String::from("SYSTEM"))
    }
}

/// Split an optional `:port` suffix off the host. A suffix that does not
/// parse as a port is treated as part of the hostname.
fn split_host_port(raw: &str) -> (&str, u16) {
    match raw.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (raw, DEFAULT_MYSQL_PORT),
        },
        None => (raw, DEFAULT_MYSQL_PORT),
    }
}

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::{DataManagerError, DB_HOST_VAR, DB_NAME_VAR, DB_PASSWORD_VAR, DB_PORT_VAR, DB_USERNAME_VAR};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "scandb";
pub const DEFAULT_PORT: u16 = 5432;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the scan database. Read once at startup and never changed.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Credentials are required, host, port and database name fall back to defaults.
    pub fn from_env() -> Result<Self, DataManagerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DataManagerError> {
        let required = |key: &str| lookup(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DataManagerError::Config(format!("{key} must be set")));

        let port = match lookup(DB_PORT_VAR) {
            Some(port) => port.parse()
                .map_err(|_| DataManagerError::Config(format!("{DB_PORT_VAR} is not a valid port: {port}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup(DB_HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database: lookup(DB_NAME_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            username: required(DB_USERNAME_VAR)?,
            password: required(DB_PASSWORD_VAR)?,
            connect_timeout: CONNECT_TIMEOUT,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn credentials_only_uses_defaults() {
        let config = DatabaseConfig::from_lookup(lookup(&[(DB_USERNAME_VAR, "scanner"), (DB_PASSWORD_VAR, "hunter2")])).unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.username, "scanner");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_password_is_a_config_error() {
        let err = DatabaseConfig::from_lookup(lookup(&[(DB_USERNAME_VAR, "scanner")])).unwrap_err();
        assert!(matches!(err, DataManagerError::Config(msg) if msg.contains(DB_PASSWORD_VAR)));
    }

    #[test]
    fn empty_username_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup(&[(DB_USERNAME_VAR, ""), (DB_PASSWORD_VAR, "x")])).unwrap_err();
        assert!(matches!(err, DataManagerError::Config(_)));
    }

    #[test]
    fn overrides_are_read() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            (DB_USERNAME_VAR, "u"),
            (DB_PASSWORD_VAR, "p"),
            (DB_HOST_VAR, "db.internal"),
            (DB_PORT_VAR, "6543"),
            (DB_NAME_VAR, "scans"),
        ])).unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.database, "scans");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup(&[(DB_USERNAME_VAR, "u"), (DB_PASSWORD_VAR, "p"), (DB_PORT_VAR, "http")])).unwrap_err();
        assert!(matches!(err, DataManagerError::Config(_)));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = DatabaseConfig::from_lookup(lookup(&[(DB_USERNAME_VAR, "u"), (DB_PASSWORD_VAR, "secret-pw")])).unwrap();
        assert!(!format!("{config:?}").contains("secret-pw"));
    }
}

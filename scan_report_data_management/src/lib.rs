pub mod config;
pub mod database;
pub mod memory;
pub mod source;
mod data_manager;

pub use data_manager::*;

/// Environment variable holding the database user name.
pub const DB_USERNAME_VAR: &str = "DB_USERNAME";
/// Environment variable holding the database password.
pub const DB_PASSWORD_VAR: &str = "DB_PASSWORD";
pub const DB_HOST_VAR: &str = "DB_HOST";
pub const DB_NAME_VAR: &str = "DB_NAME";
pub const DB_PORT_VAR: &str = "DB_PORT";

#[derive(Debug, thiserror::Error)]
pub enum DataManagerError {
    /// The database could not be reached, or the statement failed.
    #[error("scan database unavailable: {0}")]
    Unavailable(String),
    /// The country has no row, or the requested column is NULL.
    #[error("no {0} recorded for country {1}")]
    NotFound(&'static str, String),
    #[error("unknown country code {0}")]
    UnknownCountry(String),
    #[error("malformed {0} for country {1}: {2}")]
    Malformed(&'static str, String, String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl DataManagerError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DataManagerError::Unavailable(_))
    }
}

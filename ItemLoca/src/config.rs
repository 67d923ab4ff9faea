//! Catalog backend selection and connection credentials
//!
//! Credentials use the flat layout of the marketplace tooling:
//!
//! ```json
//! {
//!     "psql_db_name": "marketplace",
//!     "psql_user": "postgres",
//!     "psql_password": "secret",
//!     "psql_host": "127.0.0.1",
//!     "psql_port": "5432",
//!     "sqlite3_db_dir": "marketplace.db"
//! }
//! ```
//!
//! The same keys may be written as a TOML file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default `PostgreSQL` port when `psql_port` is omitted
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Catalog database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `SQLite` file
    Sqlite,
    /// `PostgreSQL` server
    Postgres,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite3" | "sqlite" => Ok(Self::Sqlite),
            "psql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(Error::UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite3"),
            Self::Postgres => f.write_str("psql"),
        }
    }
}

/// Port written either as `"5432"` or `5432`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    fn to_port(&self) -> Result<u16> {
        match self {
            Self::Number(port) => Ok(*port),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::MissingCredential("psql_port (not a valid port number)")),
        }
    }
}

/// Connection credentials for every supported backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub psql_db_name: Option<String>,
    #[serde(default)]
    pub psql_user: Option<String>,
    #[serde(default)]
    pub psql_password: Option<String>,
    #[serde(default)]
    pub psql_host: Option<String>,
    #[serde(default)]
    pub psql_port: Option<PortValue>,
    #[serde(default)]
    pub sqlite3_db_dir: Option<PathBuf>,
}

/// Resolved `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Credentials {
    /// Load credentials from a `.json` or `.toml` file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has another extension,
    /// or does not deserialize.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let content = fs::read_to_string(path)?;
        let credentials = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(Error::UnsupportedCredentialsFormat(path.to_path_buf())),
        };

        tracing::debug!("Loaded credentials from {}", path.display());
        Ok(credentials)
    }

    /// Parse credentials from JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse credentials from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Path of the `SQLite` database file.
    pub fn sqlite_path(&self) -> Result<&Path> {
        self.sqlite3_db_dir
            .as_deref()
            .ok_or(Error::MissingCredential("sqlite3_db_dir"))
    }

    /// `PostgreSQL` settings; host defaults to `127.0.0.1`, port to 5432.
    pub fn postgres_settings(&self) -> Result<PostgresSettings> {
        let dbname = self
            .psql_db_name
            .clone()
            .ok_or(Error::MissingCredential("psql_db_name"))?;
        let user = self
            .psql_user
            .clone()
            .ok_or(Error::MissingCredential("psql_user"))?;
        let port = match &self.psql_port {
            Some(port) => port.to_port()?,
            None => DEFAULT_POSTGRES_PORT,
        };

        Ok(PostgresSettings {
            host: self
                .psql_host
                .clone()
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            user,
            password: self.psql_password.clone().unwrap_or_default(),
            dbname,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backend_names() {
        assert_eq!("sqlite3".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("psql".parse::<Backend>().unwrap(), Backend::Postgres);
        assert_eq!("PostgreSQL".parse::<Backend>().unwrap(), Backend::Postgres);
        assert!(matches!(
            "mysql".parse::<Backend>(),
            Err(Error::UnsupportedBackend(_))
        ));
        assert_eq!(Backend::Sqlite.to_string(), "sqlite3");
    }

    #[test]
    fn test_json_credentials_with_string_port() {
        let credentials = Credentials::from_json_str(
            r#"{
                "psql_db_name": "marketplace",
                "psql_user": "postgres",
                "psql_password": "secret",
                "psql_host": "db.local",
                "psql_port": "6543",
                "sqlite3_db_dir": "marketplace.db"
            }"#,
        )
        .unwrap();

        assert_eq!(credentials.sqlite_path().unwrap(), Path::new("marketplace.db"));
        assert_eq!(
            credentials.postgres_settings().unwrap(),
            PostgresSettings {
                host: "db.local".to_string(),
                port: 6543,
                user: "postgres".to_string(),
                password: "secret".to_string(),
                dbname: "marketplace".to_string(),
            }
        );
    }

    #[test]
    fn test_toml_credentials_with_numeric_port() {
        let credentials = Credentials::from_toml_str(
            "psql_db_name = \"marketplace\"\npsql_user = \"app\"\npsql_port = 5433\n",
        )
        .unwrap();

        let settings = credentials.postgres_settings().unwrap();
        assert_eq!(settings.port, 5433);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.password, "");
    }

    #[test]
    fn test_missing_fields() {
        let credentials = Credentials::default();

        assert!(matches!(
            credentials.sqlite_path(),
            Err(Error::MissingCredential("sqlite3_db_dir"))
        ));
        assert!(matches!(
            credentials.postgres_settings(),
            Err(Error::MissingCredential("psql_db_name"))
        ));
    }

    #[test]
    fn test_bad_port() {
        let credentials = Credentials::from_json_str(
            r#"{"psql_db_name": "m", "psql_user": "u", "psql_port": "http"}"#,
        )
        .unwrap();

        assert!(credentials.postgres_settings().is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("creds.json");
        std::fs::write(&json, r#"{"sqlite3_db_dir": "m.db"}"#).unwrap();
        let yaml = dir.path().join("creds.yaml");
        std::fs::write(&yaml, "sqlite3_db_dir: m.db").unwrap();

        assert_eq!(
            Credentials::load(&json).unwrap().sqlite_path().unwrap(),
            Path::new("m.db")
        );
        assert!(matches!(
            Credentials::load(&yaml),
            Err(Error::UnsupportedCredentialsFormat(_))
        ));
    }
}

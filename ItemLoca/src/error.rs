//! Error types for `ItemLoca`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ItemLoca` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Selector Errors ====================
    /// The requested locale has no localization documents or title column.
    #[error("unsupported locale: {0:?} (supported: en, cn)")]
    UnsupportedLocale(String),

    /// The requested region has no catalog partition.
    #[error("unsupported region: {0:?} (supported: eu, ru)")]
    UnsupportedRegion(String),

    /// The requested item category has no naming rule.
    #[error("unsupported category: {0:?} (supported: weapon, camouflage, appearance, equipment)")]
    UnsupportedCategory(String),

    /// The requested catalog backend is not available.
    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),

    // ==================== Localization Errors ====================
    /// A localization document could not be read or parsed.
    #[error("failed to load localization file {path}: {source}")]
    LocalizationLoad {
        /// The document that failed to load.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// The localization document is structurally invalid.
    #[error("invalid localization document: {0}")]
    InvalidDocument(String),

    // ==================== Catalog Errors ====================
    /// The catalog connection could not be opened.
    #[error("failed to connect to {backend} catalog: {message}")]
    CatalogConnect {
        /// Backend name (`sqlite3`, `psql`, ...).
        backend: &'static str,
        /// The driver error message.
        message: String,
    },

    /// Reading item rows from the catalog failed.
    #[error("failed to fetch items from {table}: {message}")]
    CatalogFetch {
        /// The catalog table queried.
        table: String,
        /// The driver error message.
        message: String,
    },

    /// Writing translations (or schema columns) to the catalog failed.
    #[error("failed to write to {table}: {message}")]
    CatalogWrite {
        /// The catalog table written.
        table: String,
        /// The driver error message.
        message: String,
    },

    /// Beginning, committing or rolling back a batch failed.
    #[error("catalog transaction error: {0}")]
    CatalogTransaction(String),

    // ==================== Configuration Errors ====================
    /// A credential required by the selected backend is absent.
    #[error("missing credential field: {0}")]
    MissingCredential(&'static str),

    /// The credentials file has an unrecognised extension.
    #[error("unsupported credentials format: {0} (expected .json or .toml)")]
    UnsupportedCredentialsFormat(PathBuf),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl Error {
    /// Whether this error was raised by selector validation (locale, region,
    /// category or backend) rather than by I/O.
    #[must_use]
    pub fn is_unsupported_selector(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedLocale(_)
                | Error::UnsupportedRegion(_)
                | Error::UnsupportedCategory(_)
                | Error::UnsupportedBackend(_)
        )
    }
}

/// A specialized Result type for `ItemLoca` operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Marketplace catalog storage
//!
//! The catalog is a set of item tables, one per [`Region`]. Every backend
//! implements [`CatalogStore`]; the backend is chosen from configuration by
//! [`open_catalog`], and everything above this module works against the
//! trait only.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod sqlite;

pub use memory::MemoryCatalog;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;
pub use sqlite::SqliteCatalog;

use serde::{Deserialize, Serialize};

use crate::config::{Backend, Credentials};
use crate::error::{Error, Result};
use crate::types::{Locale, Region};

/// One catalog row, as far as name resolution is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Row identity; unique only within one region's table
    pub entity_id: i64,
    /// Internal symbolic name, e.g. `sr47_jungle`
    pub item_id: String,
    /// `weapon`, `camouflage`, `appearance` or `equipment`
    pub kind: String,
    /// Free-form classification
    pub entity_type: Option<String>,
}

impl ItemRecord {
    pub fn new(entity_id: i64, item_id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            entity_id,
            item_id: item_id.into(),
            kind: kind.into(),
            entity_type: None,
        }
    }
}

/// Parametrised access to one catalog backend.
///
/// Table and column names passed in come from [`Region::table`] and
/// [`Locale::title_column`]; values are always bound as parameters.
pub trait CatalogStore {
    /// Short backend name for logs (`sqlite3`, `psql`, `memory`)
    fn backend_name(&self) -> &'static str;

    /// All rows of `table` whose `kind` equals `kind`.
    fn fetch_items(&mut self, table: &str, kind: &str) -> Result<Vec<ItemRecord>>;

    /// Set `column` of the row with `entity_id`; `None` writes NULL.
    ///
    /// Returns the number of affected rows. Zero is not an error.
    fn update_title(
        &mut self,
        table: &str,
        column: &str,
        entity_id: i64,
        title: Option<&str>,
    ) -> Result<u64>;

    /// Add each of `columns` (as nullable text) to `table` unless present.
    ///
    /// Returns the columns that were added.
    fn ensure_columns(&mut self, table: &str, columns: &[&str]) -> Result<Vec<String>>;

    /// Start a write batch.
    fn begin(&mut self) -> Result<()>;

    /// Commit the current write batch.
    fn commit(&mut self) -> Result<()>;

    /// Discard the current write batch.
    fn rollback(&mut self) -> Result<()>;
}

impl<C: CatalogStore + ?Sized> CatalogStore for Box<C> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn fetch_items(&mut self, table: &str, kind: &str) -> Result<Vec<ItemRecord>> {
        (**self).fetch_items(table, kind)
    }

    fn update_title(
        &mut self,
        table: &str,
        column: &str,
        entity_id: i64,
        title: Option<&str>,
    ) -> Result<u64> {
        (**self).update_title(table, column, entity_id, title)
    }

    fn ensure_columns(&mut self, table: &str, columns: &[&str]) -> Result<Vec<String>> {
        (**self).ensure_columns(table, columns)
    }

    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<()> {
        (**self).rollback()
    }
}

/// Open the catalog backend selected by configuration.
///
/// # Errors
/// Returns an error if a required credential is missing, the backend was not
/// compiled in, or the connection fails.
pub fn open_catalog(backend: Backend, credentials: &Credentials) -> Result<Box<dyn CatalogStore>> {
    match backend {
        Backend::Sqlite => {
            let catalog = SqliteCatalog::open(credentials.sqlite_path()?)?;
            Ok(Box::new(catalog))
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            let catalog = PostgresCatalog::connect(&credentials.postgres_settings()?)?;
            Ok(Box::new(catalog))
        }
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => Err(Error::UnsupportedBackend(
            "psql (built without the `postgres` feature)".to_string(),
        )),
    }
}

/// Write one resolved display name back to the catalog.
///
/// The table comes from `region`, the column from `locale`. `None` clears
/// the column (no localization was found). An `entity_id` that does not
/// exist affects zero rows and is not an error.
pub fn write_translation<C: CatalogStore + ?Sized>(
    catalog: &mut C,
    entity_id: i64,
    display_name: Option<&str>,
    locale: Locale,
    region: Region,
) -> Result<u64> {
    let table = region.table();
    let column = locale.title_column();
    let affected = catalog.update_title(table, column, entity_id, display_name)?;

    if affected == 0 {
        tracing::debug!("No row with entity_id {entity_id} in {table}, {column} not updated");
    }
    Ok(affected)
}

/// Make sure `region`'s table has a title column for every supported locale.
///
/// Returns the columns that had to be added.
pub fn ensure_translation_columns<C: CatalogStore + ?Sized>(
    catalog: &mut C,
    region: Region,
) -> Result<Vec<String>> {
    let columns: Vec<&str> = Locale::ALL.iter().map(|l| l.title_column()).collect();
    let added = catalog.ensure_columns(region.table(), &columns)?;

    for column in &added {
        tracing::info!("Added column {column} to {}", region.table());
    }
    Ok(added)
}

/// Shorthand used by the adapters for fetch failures.
pub(crate) fn fetch_error(table: &str, err: impl std::fmt::Display) -> Error {
    Error::CatalogFetch {
        table: table.to_string(),
        message: err.to_string(),
    }
}

/// Shorthand used by the adapters for write failures.
pub(crate) fn write_error(table: &str, err: impl std::fmt::Display) -> Error {
    Error::CatalogWrite {
        table: table.to_string(),
        message: err.to_string(),
    }
}

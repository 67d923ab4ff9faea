//! `SQLite` catalog adapter

use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};

use super::{CatalogStore, ItemRecord, fetch_error, write_error};
use crate::error::{Error, Result};

/// Catalog stored in an `SQLite` database file.
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open an existing database file for reading and writing.
    ///
    /// The file is not created if it is missing, so a mistyped path fails
    /// here instead of producing an empty catalog.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::CatalogConnect {
            backend: "sqlite3",
            message: format!("{}: {e}", path.display()),
        })?;

        tracing::info!("Opened SQLite catalog {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::CatalogConnect {
            backend: "sqlite3",
            message: e.to_string(),
        })?;
        Ok(Self { conn })
    }

    /// Wrap an already opened connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection, e.g. for schema setup.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_columns(&self, table: &str) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }
}

impl CatalogStore for SqliteCatalog {
    fn backend_name(&self) -> &'static str {
        "sqlite3"
    }

    fn fetch_items(&mut self, table: &str, kind: &str) -> Result<Vec<ItemRecord>> {
        let sql = format!(
            "SELECT entity_id, item_id, kind, entity_type FROM {table} WHERE kind = ?1"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(|e| fetch_error(table, e))?;

        let items = stmt
            .query_map(params![kind], |row| {
                Ok(ItemRecord {
                    entity_id: row.get(0)?,
                    item_id: row.get(1)?,
                    kind: row.get(2)?,
                    entity_type: row.get(3)?,
                })
            })
            .map_err(|e| fetch_error(table, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| fetch_error(table, e))?;

        Ok(items)
    }

    fn update_title(
        &mut self,
        table: &str,
        column: &str,
        entity_id: i64,
        title: Option<&str>,
    ) -> Result<u64> {
        let sql = format!("UPDATE {table} SET {column} = ?1 WHERE entity_id = ?2");
        let affected = self
            .conn
            .execute(&sql, params![title, entity_id])
            .map_err(|e| write_error(table, e))?;
        Ok(affected as u64)
    }

    fn ensure_columns(&mut self, table: &str, columns: &[&str]) -> Result<Vec<String>> {
        let existing = self.table_columns(table).map_err(|e| write_error(table, e))?;
        if existing.is_empty() {
            return Err(write_error(table, "no such table"));
        }

        let mut added = Vec::new();
        for column in columns {
            if existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                continue;
            }
            self.conn
                .execute(&format!("ALTER TABLE {table} ADD COLUMN {column} TEXT"), [])
                .map_err(|e| write_error(table, e))?;
            added.push((*column).to_string());
        }
        Ok(added)
    }

    fn begin(&mut self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }

    fn commit(&mut self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SqliteCatalog {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        catalog
            .connection()
            .execute_batch(
                "CREATE TABLE items (
                    entity_id INTEGER PRIMARY KEY,
                    item_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    entity_type TEXT
                );
                INSERT INTO items VALUES (1, 'sr47_shop', 'weapon', 'primary');
                INSERT INTO items VALUES (2, 'sr47_jungle', 'camouflage', NULL);
                INSERT INTO items VALUES (3, 'vest_a', 'equipment', 'vest');",
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_fetch_items_by_kind() {
        let mut catalog = catalog();

        let items = catalog.fetch_items("items", "weapon").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].entity_id, 1);
        assert_eq!(items[0].item_id, "sr47_shop");
        assert_eq!(items[0].entity_type.as_deref(), Some("primary"));

        let camos = catalog.fetch_items("items", "camouflage").unwrap();
        assert_eq!(camos[0].entity_type, None);
    }

    #[test]
    fn test_fetch_missing_table_fails() {
        let mut catalog = catalog();

        assert!(matches!(
            catalog.fetch_items("items_ru", "weapon"),
            Err(Error::CatalogFetch { table, .. }) if table == "items_ru"
        ));
    }

    #[test]
    fn test_ensure_columns_then_update() {
        let mut catalog = catalog();

        let added = catalog.ensure_columns("items", &["title_en", "title_cn"]).unwrap();
        assert_eq!(added, vec!["title_en", "title_cn"]);
        assert!(catalog.ensure_columns("items", &["title_en"]).unwrap().is_empty());

        assert_eq!(catalog.update_title("items", "title_en", 3, Some("Tactical Vest")).unwrap(), 1);
        assert_eq!(catalog.update_title("items", "title_en", 42, Some("nobody")).unwrap(), 0);

        let title: String = catalog
            .connection()
            .query_row("SELECT title_en FROM items WHERE entity_id = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(title, "Tactical Vest");
    }

    #[test]
    fn test_null_title() {
        let mut catalog = catalog();
        catalog.ensure_columns("items", &["title_en"]).unwrap();

        catalog.update_title("items", "title_en", 1, Some("x")).unwrap();
        catalog.update_title("items", "title_en", 1, None).unwrap();

        let title: Option<String> = catalog
            .connection()
            .query_row("SELECT title_en FROM items WHERE entity_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(title, None);
    }

    #[test]
    fn test_rollback_discards_batch() {
        let mut catalog = catalog();
        catalog.ensure_columns("items", &["title_en"]).unwrap();

        catalog.begin().unwrap();
        catalog.update_title("items", "title_en", 1, Some("SR-47")).unwrap();
        catalog.rollback().unwrap();

        let title: Option<String> = catalog
            .connection()
            .query_row("SELECT title_en FROM items WHERE entity_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(title, None);
    }

    #[test]
    fn test_wraps_existing_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketplace.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE items_ru (
                entity_id INTEGER PRIMARY KEY,
                item_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                entity_type TEXT
            );
            INSERT INTO items_ru VALUES (9101, 'sr47_jungle', 'camouflage', NULL);",
        )
        .unwrap();

        let mut catalog = SqliteCatalog::from_connection(conn);
        catalog.ensure_columns("items_ru", &["title_cn"]).unwrap();
        catalog.update_title("items_ru", "title_cn", 9101, Some("SR-47 丛林")).unwrap();
        drop(catalog);

        let mut reopened = SqliteCatalog::open(&path).unwrap();
        let items = reopened.fetch_items("items_ru", "camouflage").unwrap();
        assert_eq!(items, vec![ItemRecord::new(9101, "sr47_jungle", "camouflage")]);
        let title: String = reopened
            .connection()
            .query_row("SELECT title_cn FROM items_ru WHERE entity_id = 9101", [], |r| r.get(0))
            .unwrap();
        assert_eq!(title, "SR-47 丛林");
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteCatalog::open(dir.path().join("missing.db"));

        assert!(matches!(result, Err(Error::CatalogConnect { backend: "sqlite3", .. })));
    }
}

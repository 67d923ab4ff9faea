//! `PostgreSQL` catalog adapter

use postgres::{Client, NoTls, Row};

use super::{CatalogStore, ItemRecord, fetch_error, write_error};
use crate::config::PostgresSettings;
use crate::error::{Error, Result};

/// Catalog stored in a `PostgreSQL` database.
pub struct PostgresCatalog {
    client: Client,
}

impl PostgresCatalog {
    /// Connect with the given settings (no TLS).
    pub fn connect(settings: &PostgresSettings) -> Result<Self> {
        let client = postgres::Config::new()
            .host(&settings.host)
            .port(settings.port)
            .user(&settings.user)
            .password(&settings.password)
            .dbname(&settings.dbname)
            .connect(NoTls)
            .map_err(|e| Error::CatalogConnect {
                backend: "psql",
                message: format!("{}@{}:{}: {e}", settings.user, settings.host, settings.port),
            })?;

        tracing::info!(
            "Connected to PostgreSQL catalog {} on {}:{}",
            settings.dbname,
            settings.host,
            settings.port
        );
        Ok(Self { client })
    }

    /// Wrap an already connected client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// `entity_id` may be declared `integer` or `bigint`.
fn entity_id(row: &Row) -> std::result::Result<i64, postgres::Error> {
    row.try_get::<_, i64>(0)
        .or_else(|_| row.try_get::<_, i32>(0).map(i64::from))
}

fn item_record(row: &Row) -> std::result::Result<ItemRecord, postgres::Error> {
    Ok(ItemRecord {
        entity_id: entity_id(row)?,
        item_id: row.try_get(1)?,
        kind: row.try_get(2)?,
        entity_type: row.try_get(3)?,
    })
}

impl CatalogStore for PostgresCatalog {
    fn backend_name(&self) -> &'static str {
        "psql"
    }

    fn fetch_items(&mut self, table: &str, kind: &str) -> Result<Vec<ItemRecord>> {
        // kind may be a custom enum type; compare as text
        let sql = format!(
            "SELECT entity_id, item_id::text, kind::text, entity_type::text \
             FROM {table} WHERE kind::text = $1"
        );
        let rows = self
            .client
            .query(&sql, &[&kind])
            .map_err(|e| fetch_error(table, e))?;

        rows.iter()
            .map(item_record)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| fetch_error(table, e))
    }

    fn update_title(
        &mut self,
        table: &str,
        column: &str,
        entity_id: i64,
        title: Option<&str>,
    ) -> Result<u64> {
        let sql = format!("UPDATE {table} SET {column} = $1 WHERE entity_id = $2::bigint");
        self.client
            .execute(&sql, &[&title, &entity_id])
            .map_err(|e| write_error(table, e))
    }

    fn ensure_columns(&mut self, table: &str, columns: &[&str]) -> Result<Vec<String>> {
        let existing: Vec<String> = self
            .client
            .query(
                "SELECT column_name::text FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = $1",
                &[&table],
            )
            .map_err(|e| write_error(table, e))?
            .iter()
            .map(|row| row.try_get(0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| write_error(table, e))?;
        if existing.is_empty() {
            return Err(write_error(table, "no such table"));
        }

        let mut added = Vec::new();
        for column in columns {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            self.client
                .batch_execute(&format!(
                    "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {column} text"
                ))
                .map_err(|e| write_error(table, e))?;
            added.push((*column).to_string());
        }
        Ok(added)
    }

    fn begin(&mut self) -> Result<()> {
        self.client
            .batch_execute("BEGIN")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }

    fn commit(&mut self) -> Result<()> {
        self.client
            .batch_execute("COMMIT")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }

    fn rollback(&mut self) -> Result<()> {
        self.client
            .batch_execute("ROLLBACK")
            .map_err(|e| Error::CatalogTransaction(e.to_string()))
    }
}

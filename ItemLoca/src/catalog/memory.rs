//! In-memory catalog
//!
//! Behaves like a tiny SQL table store: title columns must be added before
//! they can be written, and a batch rolled back restores the snapshot taken
//! at `begin`. Counts every fetch and update so callers can assert how much
//! catalog traffic an operation caused.

use std::collections::{HashMap, HashSet};

use super::{CatalogStore, ItemRecord, fetch_error, write_error};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct MemoryRow {
    record: ItemRecord,
    titles: HashMap<String, Option<String>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<MemoryRow>,
}

/// Catalog held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: HashMap<String, MemoryTable>,
    snapshot: Option<HashMap<String, MemoryTable>>,
    failing_entities: HashSet<i64>,
    fail_commit: bool,
    fetch_calls: usize,
    update_calls: usize,
    commits: usize,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table (no-op if it exists).
    pub fn create_table(&mut self, table: &str) {
        self.tables.entry(table.to_string()).or_default();
    }

    /// Append a row, creating the table if needed.
    pub fn insert(&mut self, table: &str, record: ItemRecord) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .rows
            .push(MemoryRow {
                record,
                titles: HashMap::new(),
            });
    }

    /// Current value of a title column; `None` for NULL, unknown rows or
    /// unknown columns.
    #[must_use]
    pub fn title(&self, table: &str, entity_id: i64, column: &str) -> Option<&str> {
        self.tables
            .get(table)?
            .rows
            .iter()
            .find(|row| row.record.entity_id == entity_id)?
            .titles
            .get(column)?
            .as_deref()
    }

    /// Whether the title column of a row has been written at all (NULL
    /// included).
    #[must_use]
    pub fn is_written(&self, table: &str, entity_id: i64, column: &str) -> bool {
        self.tables.get(table).is_some_and(|t| {
            t.rows
                .iter()
                .any(|row| row.record.entity_id == entity_id && row.titles.contains_key(column))
        })
    }

    /// Columns added to `table` so far.
    #[must_use]
    pub fn columns(&self, table: &str) -> &[String] {
        self.tables
            .get(table)
            .map(|t| t.columns.as_slice())
            .unwrap_or_default()
    }

    /// Make every update of `entity_id` fail.
    pub fn fail_update_on(&mut self, entity_id: i64) {
        self.failing_entities.insert(entity_id);
    }

    /// Make the next commit fail, leaving the batch open.
    pub fn fail_next_commit(&mut self) {
        self.fail_commit = true;
    }

    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls
    }

    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls
    }

    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl CatalogStore for MemoryCatalog {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn fetch_items(&mut self, table: &str, kind: &str) -> Result<Vec<ItemRecord>> {
        self.fetch_calls += 1;
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| fetch_error(table, "no such table"))?;

        Ok(rows
            .rows
            .iter()
            .filter(|row| row.record.kind == kind)
            .map(|row| row.record.clone())
            .collect())
    }

    fn update_title(
        &mut self,
        table: &str,
        column: &str,
        entity_id: i64,
        title: Option<&str>,
    ) -> Result<u64> {
        self.update_calls += 1;
        if self.failing_entities.contains(&entity_id) {
            return Err(write_error(table, format!("injected failure for {entity_id}")));
        }

        let target = self
            .tables
            .get_mut(table)
            .ok_or_else(|| write_error(table, "no such table"))?;
        if !target.columns.iter().any(|c| c == column) {
            return Err(write_error(table, format!("no such column: {column}")));
        }

        let mut affected = 0;
        for row in target.rows.iter_mut().filter(|r| r.record.entity_id == entity_id) {
            row.titles
                .insert(column.to_string(), title.map(str::to_string));
            affected += 1;
        }
        Ok(affected)
    }

    fn ensure_columns(&mut self, table: &str, columns: &[&str]) -> Result<Vec<String>> {
        let target = self
            .tables
            .get_mut(table)
            .ok_or_else(|| write_error(table, "no such table"))?;

        let mut added = Vec::new();
        for column in columns {
            if !target.columns.iter().any(|c| c == column) {
                target.columns.push((*column).to_string());
                added.push((*column).to_string());
            }
        }
        Ok(added)
    }

    fn begin(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(Error::CatalogTransaction(
                "cannot start a transaction within a transaction".to_string(),
            ));
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if std::mem::take(&mut self.fail_commit) {
            return Err(Error::CatalogTransaction("injected commit failure".to_string()));
        }
        if self.snapshot.take().is_none() {
            return Err(Error::CatalogTransaction(
                "cannot commit - no transaction is active".to_string(),
            ));
        }
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let snapshot = self.snapshot.take().ok_or_else(|| {
            Error::CatalogTransaction("cannot rollback - no transaction is active".to_string())
        })?;
        self.tables = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_filters_by_kind() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(1, "sr47", "weapon"));
        catalog.insert("items", ItemRecord::new(2, "sr47_jungle", "camouflage"));

        let rows = catalog.fetch_items("items", "camouflage").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, "sr47_jungle");
        assert_eq!(catalog.fetch_calls(), 1);

        assert!(matches!(
            catalog.fetch_items("items_ru", "weapon"),
            Err(Error::CatalogFetch { .. })
        ));
    }

    #[test]
    fn test_update_requires_column() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(1, "sr47", "weapon"));

        assert!(catalog.update_title("items", "title_en", 1, Some("SR-47")).is_err());

        catalog.ensure_columns("items", &["title_en"]).unwrap();
        assert_eq!(catalog.update_title("items", "title_en", 1, Some("SR-47")).unwrap(), 1);
        assert_eq!(catalog.title("items", 1, "title_en"), Some("SR-47"));
    }

    #[test]
    fn test_null_write_is_recorded() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(1, "sr47", "weapon"));
        catalog.ensure_columns("items", &["title_en"]).unwrap();

        catalog.update_title("items", "title_en", 1, None).unwrap();
        assert!(catalog.is_written("items", 1, "title_en"));
        assert_eq!(catalog.title("items", 1, "title_en"), None);
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(1, "sr47", "weapon"));
        catalog.ensure_columns("items", &["title_en"]).unwrap();

        catalog.begin().unwrap();
        catalog.update_title("items", "title_en", 1, Some("SR-47")).unwrap();
        catalog.rollback().unwrap();
        assert_eq!(catalog.title("items", 1, "title_en"), None);

        catalog.begin().unwrap();
        catalog.update_title("items", "title_en", 1, Some("SR-47")).unwrap();
        catalog.commit().unwrap();
        assert_eq!(catalog.title("items", 1, "title_en"), Some("SR-47"));
        assert_eq!(catalog.commits(), 1);
        assert!(catalog.commit().is_err());
    }

    #[test]
    fn test_failed_commit_keeps_batch_open() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(1, "sr47", "weapon"));
        catalog.ensure_columns("items", &["title_en"]).unwrap();
        catalog.fail_next_commit();

        catalog.begin().unwrap();
        catalog.update_title("items", "title_en", 1, Some("SR-47")).unwrap();
        assert!(matches!(catalog.commit(), Err(Error::CatalogTransaction(_))));
        catalog.rollback().unwrap();

        assert!(!catalog.is_written("items", 1, "title_en"));
        assert_eq!(catalog.commits(), 0);
    }

    #[test]
    fn test_created_table_starts_empty() {
        let mut catalog = MemoryCatalog::new();
        catalog.create_table("items_ru");

        assert!(catalog.fetch_items("items_ru", "weapon").unwrap().is_empty());
        assert_eq!(catalog.ensure_columns("items_ru", &["title_en"]).unwrap(), vec!["title_en"]);

        // existing rows survive a second create
        catalog.insert("items_ru", ItemRecord::new(5, "vest_a", "equipment"));
        catalog.create_table("items_ru");
        assert_eq!(catalog.fetch_items("items_ru", "equipment").unwrap().len(), 1);
        assert_eq!(catalog.columns("items_ru"), ["title_en".to_string()]);
    }
}

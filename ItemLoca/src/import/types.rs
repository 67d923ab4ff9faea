//! Types for import options, progress tracking and reports

use serde::Serialize;

use crate::types::{Category, Locale, Region};

// ============================================================================
// Options
// ============================================================================

/// What an import run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Catalog partitions to update
    pub regions: Vec<Region>,
    /// Title columns to fill
    pub locales: Vec<Locale>,
    /// Item categories to resolve
    pub categories: Vec<Category>,
    /// Resolve and report without writing
    pub dry_run: bool,
    /// Add missing `title_<locale>` columns before writing
    pub ensure_columns: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            regions: Region::ALL.to_vec(),
            locales: Locale::ALL.to_vec(),
            categories: Category::ALL.to_vec(),
            dry_run: false,
            ensure_columns: true,
        }
    }
}

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for import runs
pub type ImportProgressCallback<'a> = &'a dyn Fn(&ImportProgress);

/// Progress information during an import run
#[derive(Debug, Clone)]
pub struct ImportProgress {
    /// Current operation phase
    pub phase: ImportPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Pass or item being processed (if applicable)
    pub label: Option<String>,
}

impl ImportProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ImportPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            label: None,
        }
    }

    /// Create a progress update with a label
    #[must_use]
    pub fn with_label(
        phase: ImportPhase,
        current: usize,
        total: usize,
        label: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            label: Some(label.into()),
        }
    }
}

/// Phase of an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    /// Adding missing title columns
    EnsuringColumns,
    /// Parsing localization documents
    LoadingDocuments,
    /// Fetching rows and resolving names
    Resolving,
    /// Writing titles back to the catalog
    Writing,
    /// Committing the pass
    Committing,
    /// Run complete
    Complete,
}

impl ImportPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnsuringColumns => "Checking title columns",
            Self::LoadingDocuments => "Loading localization files",
            Self::Resolving => "Resolving names",
            Self::Writing => "Writing titles",
            Self::Committing => "Committing",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of one category within a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    /// Rows fetched from the catalog
    pub rows: usize,
    /// Rows with a display name
    pub resolved: usize,
    /// Rows without a localization entry
    pub missing: usize,
    /// Rows changed by the write-back
    pub rows_updated: u64,
    /// Writes that matched no row
    pub rows_unmatched: usize,
}

/// Outcome of one (region, locale) pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub region: Region,
    pub locale: Locale,
    pub categories: Vec<CategoryReport>,
    /// Title columns added before this pass
    pub columns_added: Vec<String>,
}

impl PassReport {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.categories.iter().map(|c| c.rows).sum()
    }

    #[must_use]
    pub fn resolved(&self) -> usize {
        self.categories.iter().map(|c| c.resolved).sum()
    }

    #[must_use]
    pub fn missing(&self) -> usize {
        self.categories.iter().map(|c| c.missing).sum()
    }

    #[must_use]
    pub fn rows_updated(&self) -> u64 {
        self.categories.iter().map(|c| c.rows_updated).sum()
    }
}

/// Outcome of a whole import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub passes: Vec<PassReport>,
    pub dry_run: bool,
}

impl ImportReport {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.passes.iter().map(PassReport::rows).sum()
    }

    #[must_use]
    pub fn resolved(&self) -> usize {
        self.passes.iter().map(PassReport::resolved).sum()
    }

    #[must_use]
    pub fn missing(&self) -> usize {
        self.passes.iter().map(PassReport::missing).sum()
    }

    #[must_use]
    pub fn rows_updated(&self) -> u64 {
        self.passes.iter().map(PassReport::rows_updated).sum()
    }
}

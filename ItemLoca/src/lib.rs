//! # itemloca
//!
//! Imports localized display names for marketplace items from the game's
//! text XML localization files into a catalog database.
//!
//! ## Pieces
//!
//! - **Localization documents** - `text_weapons.xml` / `text_armors.xml` per locale
//! - **Name resolution** - weapons, camouflages, armor skins and gear
//! - **Catalog backends** - `SQLite` and `PostgreSQL` item tables per region
//! - **Import runs** - every (region, locale) pass committed as one batch
//!
//! ## Quick Start
//!
//! ### Resolving a Single Item
//!
//! ```
//! use itemloca::prelude::*;
//!
//! let weapons: LocalizationDocument = [
//!     ("sr47_shop_name", "SR-47"),
//!     ("sr47_jungle_name", "Jungle"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let name = resolve(Category::Camouflage, "sr47_jungle", &weapons);
//! assert_eq!(name.display_name(), Some("SR-47 Jungle"));
//! ```
//!
//! ### Importing Into a Catalog
//!
//! ```no_run
//! use itemloca::prelude::*;
//!
//! let credentials = Credentials::load("credentials.json")?;
//! let mut catalog = open_catalog(Backend::Sqlite, &credentials)?;
//! let documents = FsDocumentSource::new("Localization");
//!
//! let report = run_import(&mut catalog, &documents, &ImportOptions::default())?;
//! println!("{} titles updated", report.rows_updated());
//! # Ok::<(), itemloca::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `itemloca` command-line binary
//! - `postgres` - Enables the `PostgreSQL` catalog backend

pub mod catalog;
pub mod config;
pub mod error;
pub mod formats;
pub mod import;
pub mod resolver;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Category, Locale, Region};

    pub use crate::formats::text_xml::{
        DocumentFamily, DocumentSource, FsDocumentSource, LocalizationDocument,
        parse_localization_bytes, parse_localization_str, read_localization,
    };

    pub use crate::resolver::{
        Resolution, Translation, TranslationMapping, build_mapping, build_mapping_for, resolve,
    };

    pub use crate::catalog::{
        CatalogStore, ItemRecord, MemoryCatalog, SqliteCatalog, open_catalog, write_translation,
    };
    #[cfg(feature = "postgres")]
    pub use crate::catalog::PostgresCatalog;

    pub use crate::config::{Backend, Credentials};

    pub use crate::import::{ImportOptions, ImportProgress, ImportReport, run_import};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

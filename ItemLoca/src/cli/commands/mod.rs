use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Backend;
use crate::types::{Category, Locale, Region};

pub mod execute;
pub mod import;
pub mod lookup;
pub mod resolve;
pub mod stats;

#[derive(Subcommand)]
pub enum Commands {
    /// Import localized titles into the catalog
    Import {
        /// Catalog backend (sqlite3, psql)
        backend: Backend,

        /// Credentials file (.json or .toml)
        credentials: PathBuf,

        /// Localization root containing `<locale>/text_*.xml`
        #[arg(short = 'l', long, default_value = "Localization")]
        loca_root: PathBuf,

        /// Only import this locale (repeatable; default: all)
        #[arg(long = "locale")]
        locales: Vec<Locale>,

        /// Only update this region (repeatable; default: all)
        #[arg(long = "region")]
        regions: Vec<Region>,

        /// Only resolve this category (repeatable; default: all)
        #[arg(long = "category")]
        categories: Vec<Category>,

        /// Resolve and report without writing
        #[arg(long)]
        dry_run: bool,

        /// Do not add missing title columns
        #[arg(long)]
        no_ensure_columns: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resolve display names without touching a catalog
    Resolve {
        /// Item category (weapon, camouflage, appearance, equipment)
        #[arg(short, long)]
        category: Category,

        /// Locale (en, cn)
        #[arg(long, default_value = "en")]
        locale: Locale,

        /// Localization root containing `<locale>/text_*.xml`
        #[arg(short = 'l', long, default_value = "Localization")]
        loca_root: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Item ids to resolve
        #[arg(required = true)]
        item_ids: Vec<String>,
    },

    /// Look up one key in a localization file
    Lookup {
        /// Localization file
        path: PathBuf,

        /// Entry key (exact match)
        key: String,
    },

    /// Show localization file statistics
    Stats {
        /// Localization file(s)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

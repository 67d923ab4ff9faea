//! Command execution implementations

use super::Commands;
use super::{import, lookup, resolve, stats};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Import {
                backend,
                credentials,
                loca_root,
                locales,
                regions,
                categories,
                dry_run,
                no_ensure_columns,
                quiet,
            } => import::execute(
                *backend,
                credentials,
                loca_root,
                &import::Selection {
                    locales,
                    regions,
                    categories,
                },
                *dry_run,
                !*no_ensure_columns,
                *quiet,
            ),
            Commands::Resolve {
                category,
                locale,
                loca_root,
                json,
                item_ids,
            } => resolve::execute(*category, *locale, loca_root, item_ids, *json),
            Commands::Lookup { path, key } => lookup::execute(path, key),
            Commands::Stats { paths } => stats::execute(paths),
        }
    }
}

//! CLI command for exact-key lookups

use std::path::Path;

use crate::formats::text_xml::read_localization;

/// Print the display string stored under `key`
pub fn execute(path: &Path, key: &str) -> anyhow::Result<()> {
    let document = read_localization(path)?;

    match document.lookup(key) {
        Some(value) => println!("{value}"),
        None => anyhow::bail!("Entry not found: {key}"),
    }

    Ok(())
}

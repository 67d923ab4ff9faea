//! CLI command for localization file statistics

use std::path::PathBuf;

use crate::formats::text_xml::read_localization;

/// Show entry counts for each localization file
pub fn execute(paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut total_entries = 0;
    let mut total_skipped = 0;

    for path in paths {
        let document = read_localization(path)?;
        let entries = document.len();
        let empty = document.iter().filter(|(_, value)| value.is_empty()).count();

        println!("{}:", path.display());
        println!("  Entries: {entries}");
        if empty > 0 {
            println!("  Empty values: {empty}");
        }
        if document.skipped() > 0 {
            println!("  Skipped (no usable value or duplicate): {}", document.skipped());
        }
        println!();

        total_entries += entries;
        total_skipped += document.skipped();
    }

    if paths.len() > 1 {
        println!("Total across {} files:", paths.len());
        println!("  Entries: {total_entries}");
        println!("  Skipped: {total_skipped}");
    }

    Ok(())
}

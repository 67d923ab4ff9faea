//! CLI command for resolving names straight from the localization files

use std::path::Path;

use serde::Serialize;

use crate::formats::text_xml::{DocumentSource, FsDocumentSource};
use crate::resolver::{Resolution, resolve};
use crate::types::{Category, Locale};

#[derive(Serialize)]
struct Resolved<'a> {
    item_id: &'a str,
    #[serde(flatten)]
    resolution: Resolution,
}

/// Resolve display names for `item_ids`
pub fn execute(
    category: Category,
    locale: Locale,
    loca_root: &Path,
    item_ids: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let documents = FsDocumentSource::new(loca_root);
    let document = documents.load(locale, category.family())?;

    let results: Vec<Resolved> = item_ids
        .iter()
        .map(|item_id| Resolved {
            item_id,
            resolution: resolve(category, item_id, &document),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        match &result.resolution {
            Resolution::Found(name) => println!("{}\t{name}", result.item_id),
            Resolution::Missing { key } => println!("{}\t(missing: {key})", result.item_id),
        }
    }

    Ok(())
}

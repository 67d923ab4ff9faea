//! Per-category translation mappings

use indexmap::IndexMap;
use serde::Serialize;

use super::{Resolution, resolve};
use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::formats::text_xml::{DocumentSource, LocalizationDocument};
use crate::types::{Category, Locale, Region};

/// Resolved name of one catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub item_id: String,
    pub resolution: Resolution,
}

impl Translation {
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.resolution.display_name()
    }
}

/// `entity_id` → translation for one category in one (locale, region).
///
/// Holds exactly one entry per fetched row, in fetch order; rows whose name
/// could not be resolved are kept as [`Resolution::Missing`].
#[derive(Debug, Clone, Serialize)]
pub struct TranslationMapping {
    pub category: Category,
    pub locale: Locale,
    pub region: Region,
    entries: IndexMap<i64, Translation>,
}

impl TranslationMapping {
    #[must_use]
    pub fn get(&self, entity_id: i64) -> Option<&Translation> {
        self.entries.get(&entity_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &Translation)> {
        self.entries.iter().map(|(id, t)| (*id, t))
    }

    /// Entity ids in fetch order
    pub fn entity_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.entries.values().filter(|t| t.resolution.is_found()).count()
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.len() - self.resolved_count()
    }
}

/// Build a mapping from string selectors.
///
/// The locale and region are validated before any document is loaded or
/// any row is fetched. `region = None` selects the default region.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedLocale`] or
/// [`crate::Error::UnsupportedRegion`] for unknown selectors, otherwise
/// whatever [`build_mapping`] returns.
pub fn build_mapping_for<C, D>(
    catalog: &mut C,
    documents: &D,
    category: Category,
    locale: &str,
    region: Option<&str>,
) -> Result<TranslationMapping>
where
    C: CatalogStore + ?Sized,
    D: DocumentSource + ?Sized,
{
    let locale: Locale = locale.parse()?;
    let region = Region::select(region)?;
    build_mapping(catalog, documents, category, locale, region)
}

/// Load the category's document and build its mapping.
///
/// # Errors
/// Returns an error if the document cannot be loaded or the catalog fetch
/// fails. Missing localization entries are not errors.
pub fn build_mapping<C, D>(
    catalog: &mut C,
    documents: &D,
    category: Category,
    locale: Locale,
    region: Region,
) -> Result<TranslationMapping>
where
    C: CatalogStore + ?Sized,
    D: DocumentSource + ?Sized,
{
    let document = documents.load(locale, category.family())?;
    build_mapping_with_document(catalog, &document, category, locale, region)
}

/// Build a mapping against an already loaded document.
///
/// # Errors
/// Returns an error if the catalog fetch fails.
pub fn build_mapping_with_document<C>(
    catalog: &mut C,
    document: &LocalizationDocument,
    category: Category,
    locale: Locale,
    region: Region,
) -> Result<TranslationMapping>
where
    C: CatalogStore + ?Sized,
{
    let rows = catalog.fetch_items(region.table(), category.kind())?;
    let mut entries = IndexMap::with_capacity(rows.len());

    for item in rows {
        let resolution = resolve(category, &item.item_id, document);
        match &resolution {
            Resolution::Found(name) => {
                tracing::debug!("{} {} -> {name:?}", item.entity_id, item.item_id);
            }
            Resolution::Missing { key } => {
                tracing::debug!("{} {} -> missing ({key})", item.entity_id, item.item_id);
            }
        }

        let translation = Translation {
            item_id: item.item_id,
            resolution,
        };
        if let Some(previous) = entries.insert(item.entity_id, translation) {
            tracing::warn!(
                "Duplicate entity_id {} in {} (previous item {}), keeping the last row",
                item.entity_id,
                region.table(),
                previous.item_id
            );
        }
    }

    let mapping = TranslationMapping {
        category,
        locale,
        region,
        entries,
    };
    tracing::info!(
        "{category} [{locale}/{region}]: {} rows, {} resolved, {} missing",
        mapping.len(),
        mapping.resolved_count(),
        mapping.missing_count()
    );
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeSet;

    use super::*;
    use crate::catalog::{ItemRecord, MemoryCatalog};
    use crate::error::Error;
    use crate::formats::text_xml::DocumentFamily;

    /// Serves fixed documents and counts loads.
    struct FakeDocuments {
        weapons: LocalizationDocument,
        armors: LocalizationDocument,
        loads: Cell<usize>,
    }

    impl FakeDocuments {
        fn new() -> Self {
            Self {
                weapons: [
                    ("sr47_shop_name", "SR-47"),
                    ("sr47_jungle_name", "Jungle"),
                ]
                .into_iter()
                .collect(),
                armors: [("ui_armor_vest_a_name", "Tactical Vest")].into_iter().collect(),
                loads: Cell::new(0),
            }
        }
    }

    impl DocumentSource for FakeDocuments {
        fn load(&self, _locale: Locale, family: DocumentFamily) -> Result<LocalizationDocument> {
            self.loads.set(self.loads.get() + 1);
            Ok(match family {
                DocumentFamily::Weapons => self.weapons.clone(),
                DocumentFamily::Armors => self.armors.clone(),
            })
        }
    }

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("items", ItemRecord::new(101, "sr47_jungle", "camouflage"));
        catalog.insert("items", ItemRecord::new(102, "sr47_arctic", "camouflage"));
        catalog.insert("items", ItemRecord::new(202, "vest_a", "equipment"));
        catalog.insert("items", ItemRecord::new(303, "helmet_x", "appearance"));
        catalog.insert("items_ru", ItemRecord::new(9101, "sr47_jungle", "camouflage"));
        catalog
    }

    #[test]
    fn test_keys_match_fetched_rows() {
        let mut catalog = catalog();
        let documents = FakeDocuments::new();

        let mapping = build_mapping(&mut catalog, &documents, Category::Camouflage, Locale::En, Region::Eu)
            .unwrap();

        let fetched: BTreeSet<i64> = catalog
            .fetch_items("items", "camouflage")
            .unwrap()
            .iter()
            .map(|r| r.entity_id)
            .collect();
        let mapped: BTreeSet<i64> = mapping.entity_ids().collect();
        assert_eq!(mapped, fetched);

        assert_eq!(mapping.get(101).unwrap().display_name(), Some("SR-47 Jungle"));
        assert_eq!(mapping.get(102).unwrap().display_name(), None);
        assert_eq!(mapping.get(102).unwrap().item_id, "sr47_arctic");
        assert_eq!(mapping.resolved_count(), 1);
        assert_eq!(mapping.missing_count(), 1);
    }

    #[test]
    fn test_misses_stay_in_mapping() {
        let mut catalog = catalog();
        let documents = FakeDocuments::new();

        let mapping = build_mapping(&mut catalog, &documents, Category::Appearance, Locale::En, Region::Eu)
            .unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get(303).unwrap().resolution,
            Resolution::Missing { key: "ui_armor_helmet_x_name".to_string() }
        );
    }

    #[test]
    fn test_region_partition() {
        let mut catalog = catalog();
        let documents = FakeDocuments::new();

        let mapping = build_mapping_for(&mut catalog, &documents, Category::Camouflage, "en", Some("ru"))
            .unwrap();

        assert_eq!(mapping.region, Region::Ru);
        assert_eq!(mapping.entity_ids().collect::<Vec<_>>(), vec![9101]);
    }

    #[test]
    fn test_no_region_selects_default_partition() {
        let mut catalog = catalog();
        let documents = FakeDocuments::new();

        let mapping = build_mapping_for(&mut catalog, &documents, Category::Equipment, "cn", None)
            .unwrap();

        assert_eq!(mapping.region, Region::Eu);
        assert_eq!(mapping.locale, Locale::Cn);
        assert_eq!(mapping.get(202).unwrap().display_name(), Some("Tactical Vest"));
    }

    #[test]
    fn test_unsupported_selectors_fail_before_io() {
        let mut catalog = catalog();
        let documents = FakeDocuments::new();

        let err = build_mapping_for(&mut catalog, &documents, Category::Weapon, "fr", Some("eu"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocale(_)));

        let err = build_mapping_for(&mut catalog, &documents, Category::Weapon, "en", Some("us"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedRegion(_)));

        assert_eq!(documents.loads.get(), 0);
        assert_eq!(catalog.fetch_calls(), 0);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let mut catalog = MemoryCatalog::new();
        let documents = FakeDocuments::new();

        let err = build_mapping(&mut catalog, &documents, Category::Weapon, Locale::En, Region::Ru)
            .unwrap_err();
        assert!(matches!(err, Error::CatalogFetch { .. }));
    }
}

//! Catalog import runs
//!
//! An import walks every selected region and, inside it, every selected
//! locale. Each (region, locale) pair is one pass: its localization
//! documents are parsed once, every category is resolved, and all titles
//! are written inside a single batch that is committed at the end of the
//! pass (or rolled back if a write fails).

mod types;

pub use types::{
    CategoryReport, ImportOptions, ImportPhase, ImportProgress, ImportProgressCallback,
    ImportReport, PassReport,
};

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::catalog::{CatalogStore, ensure_translation_columns, write_translation};
use crate::error::Result;
use crate::formats::text_xml::{DocumentFamily, DocumentSource, LocalizationDocument};
use crate::resolver::{TranslationMapping, build_mapping_with_document};
use crate::types::{Locale, Region};

/// Run an import.
///
/// # Errors
/// Fails on the first missing/malformed localization document, catalog
/// fetch error or write error. Passes committed before the failure stay
/// committed.
pub fn run_import<C, D>(
    catalog: &mut C,
    documents: &D,
    options: &ImportOptions,
) -> Result<ImportReport>
where
    C: CatalogStore + ?Sized,
    D: DocumentSource + ?Sized,
{
    run_import_with_progress(catalog, documents, options, &|_| {})
}

/// Run an import with progress callback.
///
/// # Errors
/// See [`run_import`].
pub fn run_import_with_progress<C, D>(
    catalog: &mut C,
    documents: &D,
    options: &ImportOptions,
    progress: ImportProgressCallback,
) -> Result<ImportReport>
where
    C: CatalogStore + ?Sized,
    D: DocumentSource + ?Sized,
{
    let total_passes = options.regions.len() * options.locales.len();
    let mut report = ImportReport {
        passes: Vec::with_capacity(total_passes),
        dry_run: options.dry_run,
    };

    tracing::info!(
        "Importing titles via {} ({} pass(es){})",
        catalog.backend_name(),
        total_passes,
        if options.dry_run { ", dry run" } else { "" }
    );

    for &region in &options.regions {
        let mut columns_added = Vec::new();
        if options.ensure_columns && !options.dry_run {
            progress(&ImportProgress::with_label(
                ImportPhase::EnsuringColumns,
                report.passes.len() + 1,
                total_passes,
                region.table(),
            ));
            columns_added = ensure_translation_columns(catalog, region)?;
        }

        for &locale in &options.locales {
            let mut pass = run_pass(
                catalog,
                documents,
                options,
                region,
                locale,
                report.passes.len() + 1,
                total_passes,
                progress,
            )?;
            pass.columns_added = std::mem::take(&mut columns_added);
            report.passes.push(pass);
        }
    }

    progress(&ImportProgress::new(
        ImportPhase::Complete,
        total_passes,
        total_passes,
    ));
    tracing::info!(
        "Import complete: {} rows, {} resolved, {} missing, {} updated",
        report.rows(),
        report.resolved(),
        report.missing(),
        report.rows_updated()
    );
    Ok(report)
}

fn run_pass<C, D>(
    catalog: &mut C,
    documents: &D,
    options: &ImportOptions,
    region: Region,
    locale: Locale,
    pass_number: usize,
    total_passes: usize,
    progress: ImportProgressCallback,
) -> Result<PassReport>
where
    C: CatalogStore + ?Sized,
    D: DocumentSource + ?Sized,
{
    let label = format!("{locale} -> {}", region.table());
    tracing::info!("Pass {pass_number}/{total_passes}: {label}");

    progress(&ImportProgress::with_label(
        ImportPhase::LoadingDocuments,
        pass_number,
        total_passes,
        label.as_str(),
    ));
    let mut loaded: HashMap<DocumentFamily, LocalizationDocument> = HashMap::new();
    for category in &options.categories {
        if let Entry::Vacant(slot) = loaded.entry(category.family()) {
            slot.insert(documents.load(locale, category.family())?);
        }
    }

    progress(&ImportProgress::with_label(
        ImportPhase::Resolving,
        pass_number,
        total_passes,
        label.as_str(),
    ));
    let mut mappings = Vec::with_capacity(options.categories.len());
    for &category in &options.categories {
        let document = &loaded[&category.family()];
        mappings.push(build_mapping_with_document(
            catalog, document, category, locale, region,
        )?);
    }

    if options.dry_run {
        return Ok(PassReport {
            region,
            locale,
            categories: mappings.iter().map(CategoryReport::unwritten).collect(),
            columns_added: Vec::new(),
        });
    }

    catalog.begin()?;
    let categories = match write_mappings(catalog, &mappings, progress) {
        Ok(categories) => categories,
        Err(err) => {
            if let Err(rollback_err) = catalog.rollback() {
                tracing::warn!("Rollback of {label} failed: {rollback_err}");
            }
            return Err(err);
        }
    };

    progress(&ImportProgress::with_label(
        ImportPhase::Committing,
        pass_number,
        total_passes,
        label.as_str(),
    ));
    if let Err(err) = catalog.commit() {
        if let Err(rollback_err) = catalog.rollback() {
            tracing::warn!("Rollback of {label} after failed commit failed: {rollback_err}");
        }
        return Err(err);
    }

    Ok(PassReport {
        region,
        locale,
        categories,
        columns_added: Vec::new(),
    })
}

fn write_mappings<C>(
    catalog: &mut C,
    mappings: &[TranslationMapping],
    progress: ImportProgressCallback,
) -> Result<Vec<CategoryReport>>
where
    C: CatalogStore + ?Sized,
{
    let total: usize = mappings.iter().map(TranslationMapping::len).sum();
    let mut written = 0;
    let mut reports = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let mut report = CategoryReport::unwritten(mapping);
        for (entity_id, translation) in mapping.iter() {
            let affected = write_translation(
                catalog,
                entity_id,
                translation.display_name(),
                mapping.locale,
                mapping.region,
            )?;
            if affected == 0 {
                report.rows_unmatched += 1;
            }
            report.rows_updated += affected;

            written += 1;
            progress(&ImportProgress::with_label(
                ImportPhase::Writing,
                written,
                total,
                translation.item_id.as_str(),
            ));
        }
        reports.push(report);
    }

    Ok(reports)
}

impl CategoryReport {
    /// Counts of a mapping before anything is written.
    fn unwritten(mapping: &TranslationMapping) -> Self {
        Self {
            category: mapping.category,
            rows: mapping.len(),
            resolved: mapping.resolved_count(),
            missing: mapping.missing_count(),
            rows_updated: 0,
            rows_unmatched: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::catalog::{ItemRecord, MemoryCatalog};
    use crate::error::Error;
    use crate::types::Category;

    struct FakeDocuments {
        loads: Cell<usize>,
    }

    impl DocumentSource for FakeDocuments {
        fn load(&self, locale: Locale, family: DocumentFamily) -> Result<LocalizationDocument> {
            self.loads.set(self.loads.get() + 1);
            let doc = match (locale, family) {
                (Locale::En, DocumentFamily::Weapons) => vec![
                    ("sr47_shop_name", "SR-47"),
                    ("sr47_jungle_name", "Jungle"),
                ],
                (Locale::Cn, DocumentFamily::Weapons) => vec![
                    ("sr47_shop_name", "SR-47"),
                    ("sr47_jungle_name", "丛林"),
                ],
                (Locale::En, DocumentFamily::Armors) => {
                    vec![("ui_armor_vest_a_name", "Tactical Vest")]
                }
                (Locale::Cn, DocumentFamily::Armors) => vec![("ui_armor_vest_a_name", "战术背心")],
            };
            Ok(doc.into_iter().collect())
        }
    }

    fn documents() -> FakeDocuments {
        FakeDocuments { loads: Cell::new(0) }
    }

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        for table in ["items", "items_ru"] {
            catalog.insert(table, ItemRecord::new(101, "sr47_jungle", "camouflage"));
            catalog.insert(table, ItemRecord::new(202, "vest_a", "equipment"));
            catalog.insert(table, ItemRecord::new(303, "helmet_x", "appearance"));
        }
        catalog
    }

    #[test]
    fn test_full_import_writes_every_pass() {
        let mut catalog = catalog();
        let documents = documents();

        let report = run_import(&mut catalog, &documents, &ImportOptions::default()).unwrap();

        assert_eq!(report.passes.len(), 4);
        assert_eq!(catalog.commits(), 4);
        // one weapons + one armors document per pass
        assert_eq!(documents.loads.get(), 8);

        assert_eq!(catalog.title("items", 101, "title_en"), Some("SR-47 Jungle"));
        assert_eq!(catalog.title("items_ru", 101, "title_cn"), Some("SR-47 丛林"));
        assert_eq!(catalog.title("items", 202, "title_cn"), Some("战术背心"));
        assert!(catalog.is_written("items", 303, "title_en"));
        assert_eq!(catalog.title("items", 303, "title_en"), None);

        assert_eq!(report.rows(), 12);
        assert_eq!(report.resolved(), 8);
        assert_eq!(report.missing(), 4);
        assert_eq!(report.rows_updated(), 12);
        assert_eq!(report.passes[0].columns_added, vec!["title_en", "title_cn"]);
        assert!(report.passes[1].columns_added.is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut catalog = catalog();
        let options = ImportOptions {
            dry_run: true,
            ..ImportOptions::default()
        };

        let report = run_import(&mut catalog, &documents(), &options).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.resolved(), 8);
        assert_eq!(report.rows_updated(), 0);
        assert_eq!(catalog.update_calls(), 0);
        assert_eq!(catalog.commits(), 0);
        assert!(catalog.columns("items").is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back_pass() {
        let mut catalog = catalog();
        catalog.fail_update_on(303);
        let options = ImportOptions {
            regions: vec![Region::Eu],
            locales: vec![Locale::En],
            ..ImportOptions::default()
        };

        let err = run_import(&mut catalog, &documents(), &options).unwrap_err();

        assert!(matches!(err, Error::CatalogWrite { .. }));
        assert_eq!(catalog.commits(), 0);
        // 101 was written before 303 failed, then rolled back
        assert!(!catalog.is_written("items", 101, "title_en"));
    }

    #[test]
    fn test_failed_commit_rolls_back_pass() {
        let mut catalog = catalog();
        catalog.fail_next_commit();
        let options = ImportOptions {
            regions: vec![Region::Eu],
            locales: vec![Locale::En],
            ..ImportOptions::default()
        };

        let err = run_import(&mut catalog, &documents(), &options).unwrap_err();

        assert!(matches!(err, Error::CatalogTransaction(_)));
        assert_eq!(catalog.commits(), 0);
        assert!(!catalog.is_written("items", 101, "title_en"));
        // the batch was closed, so a new one can start
        catalog.begin().unwrap();
    }

    #[test]
    fn test_selected_categories_only() {
        let mut catalog = catalog();
        let documents = documents();
        let options = ImportOptions {
            regions: vec![Region::Ru],
            locales: vec![Locale::En],
            categories: vec![Category::Equipment],
            ..ImportOptions::default()
        };

        let report = run_import(&mut catalog, &documents, &options).unwrap();

        assert_eq!(documents.loads.get(), 1);
        assert_eq!(report.rows(), 1);
        assert_eq!(catalog.title("items_ru", 202, "title_en"), Some("Tactical Vest"));
        assert!(!catalog.is_written("items_ru", 101, "title_en"));
    }

    #[test]
    fn test_progress_reports_phases() {
        let mut catalog = catalog();
        let phases = RefCell::new(Vec::new());
        let options = ImportOptions {
            regions: vec![Region::Eu],
            locales: vec![Locale::En],
            ..ImportOptions::default()
        };

        run_import_with_progress(&mut catalog, &documents(), &options, &|p| {
            phases.borrow_mut().push(p.phase);
        })
        .unwrap();

        let phases = phases.into_inner();
        assert_eq!(phases.first(), Some(&ImportPhase::EnsuringColumns));
        assert_eq!(phases.last(), Some(&ImportPhase::Complete));
        assert_eq!(phases.iter().filter(|p| **p == ImportPhase::Writing).count(), 3);
        assert!(phases.contains(&ImportPhase::Committing));
    }

    #[test]
    fn test_pass_progress_is_one_indexed() {
        let mut catalog = catalog();
        let seen = RefCell::new(Vec::new());
        let options = ImportOptions {
            locales: vec![Locale::En],
            ..ImportOptions::default()
        };

        run_import_with_progress(&mut catalog, &documents(), &options, &|p| {
            if p.phase != ImportPhase::Writing {
                seen.borrow_mut().push((p.phase, p.current, p.total));
            }
        })
        .unwrap();

        let seen = seen.into_inner();
        let ensuring: Vec<_> = seen
            .iter()
            .filter(|(phase, ..)| *phase == ImportPhase::EnsuringColumns)
            .map(|&(_, current, total)| (current, total))
            .collect();
        assert_eq!(ensuring, vec![(1, 2), (2, 2)]);
        assert!(seen.iter().all(|&(_, current, total)| (1..=total).contains(&current)));
    }
}

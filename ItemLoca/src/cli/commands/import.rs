//! CLI command for importing titles into the catalog

use std::path::Path;
use std::time::Instant;

use console::style;
use indicatif::ProgressBar;

use crate::catalog::open_catalog;
use crate::cli::progress::{
    DISK, LINK, LOOKING_GLASS, SPARKLE, print_done, print_step, simple_bar,
};
use crate::config::{Backend, Credentials};
use crate::formats::text_xml::FsDocumentSource;
use crate::import::{ImportOptions, ImportPhase, ImportReport, run_import_with_progress};
use crate::types::{Category, Locale, Region};

/// Selectors given on the command line; empty means "all".
pub struct Selection<'a> {
    pub locales: &'a [Locale],
    pub regions: &'a [Region],
    pub categories: &'a [Category],
}

impl Selection<'_> {
    fn options(&self, dry_run: bool, ensure_columns: bool) -> ImportOptions {
        let defaults = ImportOptions::default();
        ImportOptions {
            regions: or_default(self.regions, defaults.regions),
            locales: or_default(self.locales, defaults.locales),
            categories: or_default(self.categories, defaults.categories),
            dry_run,
            ensure_columns,
        }
    }
}

fn or_default<T: Copy>(selected: &[T], default: Vec<T>) -> Vec<T> {
    if selected.is_empty() {
        default
    } else {
        selected.to_vec()
    }
}

/// Run an import against the configured catalog
pub fn execute(
    backend: Backend,
    credentials: &Path,
    loca_root: &Path,
    selection: &Selection<'_>,
    dry_run: bool,
    ensure_columns: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let options = selection.options(dry_run, ensure_columns);

    if !quiet {
        print_step(1, 3, LOOKING_GLASS, &format!("Opening {backend} catalog..."));
    }
    let credentials = Credentials::load(credentials)?;
    let mut catalog = open_catalog(backend, &credentials)?;
    let documents = FsDocumentSource::new(loca_root);

    if !quiet {
        print_step(2, 3, LINK, "Resolving titles...");
    }
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        simple_bar(0, "Starting")
    };

    let report = run_import_with_progress(&mut catalog, &documents, &options, &|progress| {
        match progress.phase {
            ImportPhase::Writing => {
                pb.set_length(progress.total as u64);
                pb.set_position(progress.current as u64);
            }
            ImportPhase::Complete => {}
            phase => {
                pb.set_position(0);
                match &progress.label {
                    Some(label) => pb.set_message(format!("{} ({label})", phase.as_str())),
                    None => pb.set_message(phase.as_str()),
                }
            }
        }
    })?;
    pb.finish_and_clear();

    if !quiet {
        let step = if dry_run { "Dry run summary" } else { "Written titles" };
        print_step(3, 3, DISK, &format!("{step}:"));
    }
    print_report(&report);

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}

/// Print a per-pass summary
fn print_report(report: &ImportReport) {
    for pass in &report.passes {
        println!(
            "{} {} -> {}",
            SPARKLE,
            style(pass.locale).bold(),
            style(pass.region.table()).bold()
        );
        if !pass.columns_added.is_empty() {
            println!("  Added columns: {}", pass.columns_added.join(", "));
        }
        for category in &pass.categories {
            println!(
                "  {:<11} {:>6} rows  {:>6} resolved  {:>6} missing  {:>6} updated",
                category.category.to_string(),
                category.rows,
                category.resolved,
                style(category.missing).yellow(),
                category.rows_updated
            );
            if category.rows_unmatched > 0 {
                println!("  {:<11} {} writes matched no row", "", category.rows_unmatched);
            }
        }
    }

    println!();
    println!(
        "Total: {} rows, {} resolved, {} missing, {} updated",
        report.rows(),
        report.resolved(),
        report.missing(),
        report.rows_updated()
    );
    if report.dry_run {
        println!("\n(Dry run - no changes made)");
    }
}

//! Where localization documents come from

use std::path::{Path, PathBuf};

use super::{DocumentFamily, LocalizationDocument, read_localization};
use crate::error::Result;
use crate::types::Locale;

/// Loads the localization document for one (locale, family) pair.
///
/// Resolution code only talks to this trait, so tests can hand in
/// documents built in memory.
pub trait DocumentSource {
    /// Load (parse) the document for `locale` and `family`.
    ///
    /// # Errors
    /// Returns [`crate::Error::LocalizationLoad`] if the document is missing
    /// or malformed.
    fn load(&self, locale: Locale, family: DocumentFamily) -> Result<LocalizationDocument>;
}

/// Reads documents from a directory tree laid out as
/// `<root>/<locale>/<family file>`, e.g. `loca/en/text_weapons.xml`.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `locale` and `family`.
    #[must_use]
    pub fn path_for(&self, locale: Locale, family: DocumentFamily) -> PathBuf {
        self.root.join(locale.code()).join(family.file_name())
    }
}

impl DocumentSource for FsDocumentSource {
    fn load(&self, locale: Locale, family: DocumentFamily) -> Result<LocalizationDocument> {
        read_localization(self.path_for(locale, family))
    }
}

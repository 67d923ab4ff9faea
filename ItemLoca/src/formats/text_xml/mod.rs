//! Text XML localization documents
//!
//! The game ships one document per (locale, item family), e.g.
//! `en/text_weapons.xml` or `cn/text_armors.xml`. Each `entry` node carries
//! a `key` attribute; its second child element holds the localized string in
//! a `value` attribute:
//!
//! ```xml
//! <text>
//!   <entry key="sr47_shop_name">
//!     <original value="SR-47"/>
//!     <translation value="SR-47"/>
//!   </entry>
//! </text>
//! ```

mod reader;
mod source;

pub use reader::{parse_localization_bytes, parse_localization_str, read_localization};
pub use source::{DocumentSource, FsDocumentSource};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Element name of a localization entry
pub const ENTRY_ELEMENT: &[u8] = b"entry";

/// Attribute holding the entry key
pub const KEY_ATTRIBUTE: &[u8] = b"key";

/// Attribute holding the display string on the value-bearing child
pub const VALUE_ATTRIBUTE: &[u8] = b"value";

/// Zero-based position of the value-bearing child inside an entry
pub const VALUE_CHILD_INDEX: usize = 1;

/// Which localization document an item family lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFamily {
    /// Weapons and camouflages
    Weapons,
    /// Body skins and gear
    Armors,
}

impl DocumentFamily {
    /// File name inside a locale directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Weapons => "text_weapons.xml",
            Self::Armors => "text_armors.xml",
        }
    }
}

impl fmt::Display for DocumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Read-only key → display string index over one parsed document.
#[derive(Debug, Clone, Default)]
pub struct LocalizationDocument {
    entries: HashMap<String, String>,
    skipped: usize,
    source: Option<PathBuf>,
}

impl LocalizationDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup of a display string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of usable entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry nodes that were dropped while parsing (no key, no value-bearing
    /// child, or a duplicate key).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// File this document was read from, if any
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Iterate over `(key, value)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert an entry unless the key is already present.
    ///
    /// Returns `false` for a duplicate; the first value is kept.
    pub(crate) fn insert_first(&mut self, key: String, value: String) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    pub(crate) fn mark_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn set_source(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizationDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut document = Self::new();
        for (key, value) in iter {
            if !document.insert_first(key.into(), value.into()) {
                document.mark_skipped();
            }
        }
        document
    }
}

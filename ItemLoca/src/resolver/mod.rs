//! Item name resolution
//!
//! Turns a catalog `item_id` into a display name by deriving the
//! localization key(s) for its [`Category`] and looking them up in the
//! category's document:
//!
//! | Category   | Key(s)                                                     | Document   |
//! |------------|------------------------------------------------------------|------------|
//! | weapon     | `<id>_name` if `<id>` contains `_shop`, else `<id>_shop_name` | weapons |
//! | camouflage | `<weapon>_shop_name` + `<id>_name`, joined by a space       | weapons    |
//! | appearance | `ui_armor_<id>_name`                                       | armors     |
//! | equipment  | `ui_armor_<id>_name`                                       | armors     |
//!
//! For camouflages `<weapon>` is the part of the id before its first `_`.

mod mapping;

pub use mapping::{
    Translation, TranslationMapping, build_mapping, build_mapping_for,
    build_mapping_with_document,
};

use serde::{Deserialize, Serialize};

use crate::formats::text_xml::LocalizationDocument;
use crate::types::Category;

/// Localization key(s) derived from one `item_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKeys {
    /// Looked up once
    Single(String),
    /// Base weapon name and camouflage variant name
    Composite { base: String, variant: String },
}

impl Category {
    /// Derive the localization key(s) for `item_id`.
    #[must_use]
    pub fn derive_keys(self, item_id: &str) -> LookupKeys {
        match self {
            // Some weapon ids are already shop-flavoured (`ak12_shop`)
            Self::Weapon if item_id.contains("_shop") => {
                LookupKeys::Single(format!("{item_id}_name"))
            }
            Self::Weapon => LookupKeys::Single(format!("{item_id}_shop_name")),
            Self::Camouflage => LookupKeys::Composite {
                base: format!("{}_shop_name", weapon_key(item_id)),
                variant: format!("{item_id}_name"),
            },
            Self::Appearance | Self::Equipment => {
                LookupKeys::Single(format!("ui_armor_{item_id}_name"))
            }
        }
    }
}

/// Shortened weapon key of a camouflage id: `sr47` for `sr47_jungle`.
#[must_use]
pub fn weapon_key(item_id: &str) -> &str {
    item_id.split('_').next().unwrap_or(item_id)
}

/// Outcome of resolving one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    /// A display name was found. May legitimately be empty.
    Found(String),
    /// No entry exists for `key` (for camouflages: the variant key).
    Missing { key: String },
}

impl Resolution {
    /// The display name, or `None` when nothing was found.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Found(name) => Some(name.as_str()),
            Self::Missing { .. } => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Resolve the display name of `item_id` in `document`.
///
/// A missing camouflage variant makes the whole name missing no matter
/// whether the base weapon resolved. A missing base weapon with a known
/// variant contributes an empty string, leaving `" <variant>"`.
#[must_use]
pub fn resolve(category: Category, item_id: &str, document: &LocalizationDocument) -> Resolution {
    match category.derive_keys(item_id) {
        LookupKeys::Single(key) => match document.lookup(&key) {
            Some(name) => Resolution::Found(name.to_string()),
            None => Resolution::Missing { key },
        },
        LookupKeys::Composite { base, variant } => {
            let Some(variant_name) = document.lookup(&variant) else {
                return Resolution::Missing { key: variant };
            };
            let base_name = document.lookup(&base).unwrap_or_else(|| {
                tracing::debug!("No weapon name {base} for camouflage {item_id}");
                ""
            });
            Resolution::Found(format!("{base_name} {variant_name}"))
        }
    }
}

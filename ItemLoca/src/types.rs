//! Catalog selectors: target locale, marketplace region and item category
//!
//! Each selector maps onto one physical detail of the catalog or the
//! localization tree (a column, a table, a document file), so parsing one
//! from user input is also the point where unsupported values are rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::text_xml::DocumentFamily;

// ============================================================================
// Locale
// ============================================================================

/// Target display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    En,
    /// Simplified Chinese
    Cn,
}

impl Locale {
    /// Every supported locale, in import order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Cn];

    /// Directory name of this locale's localization documents.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Cn => "cn",
        }
    }

    /// Catalog column holding display names in this locale.
    #[must_use]
    pub fn title_column(self) -> &'static str {
        match self {
            Self::En => "title_en",
            Self::Cn => "title_cn",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "cn" => Ok(Self::Cn),
            _ => Err(Error::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Region
// ============================================================================

/// Marketplace deployment; selects the catalog partition.
///
/// The same `item_id` can carry a different `entity_id` in each region, so
/// entity ids are only meaningful together with their region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// European marketplace (`items`). Also the partition used when no
    /// region is given.
    #[default]
    Eu,
    /// Russian marketplace (`items_ru`)
    Ru,
}

impl Region {
    /// Every supported region, in import order.
    pub const ALL: [Region; 2] = [Region::Eu, Region::Ru];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Eu => "eu",
            Self::Ru => "ru",
        }
    }

    /// Catalog table backing this region.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Eu => "items",
            Self::Ru => "items_ru",
        }
    }

    /// Resolve an optional region selector.
    ///
    /// `None` is the single-region deployment and selects [`Region::Eu`].
    pub fn select(selector: Option<&str>) -> Result<Self> {
        selector.map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Self::Eu),
            "ru" => Ok(Self::Ru),
            _ => Err(Error::UnsupportedRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Category
// ============================================================================

/// Item category; each one has its own localization key convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Weapon camouflage (name composed from weapon + variant)
    Camouflage,
    /// Weapon
    Weapon,
    /// Body skin
    Appearance,
    /// Gear
    Equipment,
}

impl Category {
    /// Every category, in import order.
    pub const ALL: [Category; 4] = [
        Category::Camouflage,
        Category::Weapon,
        Category::Appearance,
        Category::Equipment,
    ];

    /// Value of the catalog `kind` column for this category.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Camouflage => "camouflage",
            Self::Weapon => "weapon",
            Self::Appearance => "appearance",
            Self::Equipment => "equipment",
        }
    }

    /// Localization document this category is resolved against.
    #[must_use]
    pub fn family(self) -> DocumentFamily {
        match self {
            Self::Camouflage | Self::Weapon => DocumentFamily::Weapons,
            Self::Appearance | Self::Equipment => DocumentFamily::Armors,
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camouflage" | "camo" => Ok(Self::Camouflage),
            "weapon" => Ok(Self::Weapon),
            "appearance" | "skin" | "body_skin" => Ok(Self::Appearance),
            "equipment" | "gear" => Ok(Self::Equipment),
            _ => Err(Error::UnsupportedCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

//! Localization file formats
//!
//! - **Text XML** - `text_weapons.xml` / `text_armors.xml` localization trees

pub mod text_xml;

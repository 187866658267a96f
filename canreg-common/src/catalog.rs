//! Metadata catalog file
//!
//! The static [`MetaTable`](crate::meta::MetaTable) compiled into a device
//! also exists in file form for the tooling side: a TOML catalog listing
//! the same records, which monitoring and configuration tools load to
//! know what a device exposes without asking it.
//!
//! # An example TOML file
//!
//! ```toml
//! device = "VMU_N1"
//!
//! [[entries]]
//! index = 0x2100
//! sub = 1
//! group = "WATCH"
//! subgroup = "WATCH"
//! name = "UPTIME"
//! unit = "s"
//! display = "float32"
//! monitorable = true
//!
//! [[entries]]
//! index = 0x2102
//! sub = 1
//! group = "SYSTEM CONTROL"
//! subgroup = "EEPROM"
//! name = "EEPROM READ"
//! display = "func"
//! configurable = true
//! ```

use std::collections::HashMap;

use crate::meta::DisplayType;
use serde::Deserialize;

use snafu::ResultExt as _;
use snafu::Snafu;

/// Error returned when loading a catalog fails
#[derive(Debug, Snafu)]
pub enum LoadError {
    /// An IO error occured while reading the file
    #[snafu(display("IO error: {source}"))]
    Io {
        /// The underlying IO error
        source: std::io::Error,
    },
    /// An error occured in the TOML parser
    #[snafu(display("Toml parse error: {source}"))]
    TomlParsing {
        /// The toml error which led to this error
        source: toml::de::Error,
    },
    /// Multiple entries defined with the same key
    #[snafu(display("Multiple catalog entries for 0x{index:04X}sub{sub}"))]
    DuplicateEntries {
        /// Index of the duplicated key
        index: u16,
        /// Sub index of the duplicated key
        sub: u8,
    },
}

/// A newtype on DisplayType to implement deserialization
#[derive(Clone, Copy, Debug)]
pub struct DisplayTypeDeser(pub DisplayType);

impl<'de> serde::Deserialize<'de> for DisplayTypeDeser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "float32" => Ok(DisplayTypeDeser(DisplayType::Float32)),
            "uint32" => Ok(DisplayTypeDeser(DisplayType::Uint32)),
            "enum" => Ok(DisplayTypeDeser(DisplayType::Enum)),
            "str" => Ok(DisplayTypeDeser(DisplayType::Str)),
            "func" => Ok(DisplayTypeDeser(DisplayType::Func)),
            _ => Err(D::Error::custom(format!(
                "Invalid display type: {} (allowed: 'float32', 'uint32', 'enum', 'str', or 'func')",
                s
            ))),
        }
    }
}

impl From<DisplayTypeDeser> for DisplayType {
    fn from(value: DisplayTypeDeser) -> Self {
        value.0
    }
}

/// One entry in a catalog file
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Object index
    pub index: u16,
    /// Sub index
    #[serde(default)]
    pub sub: u8,
    /// Top-level display group
    pub group: String,
    /// Second-level display group
    pub subgroup: String,
    /// Human readable value name
    pub name: String,
    /// Unit suffix
    #[serde(default)]
    pub unit: String,
    /// Rendering type
    pub display: DisplayTypeDeser,
    /// Tools may poll this value periodically
    #[serde(default)]
    pub monitorable: bool,
    /// Tools may present this value for editing
    #[serde(default)]
    pub configurable: bool,
}

/// A metadata catalog loaded from a TOML file
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// The device name this catalog describes
    pub device: String,
    /// The catalog entries
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load a catalog from a TOML file on disk
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).context(IoSnafu)?;
        Self::load_from_str(&content)
    }

    /// Load a catalog from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = toml::from_str(content).context(TomlParsingSnafu)?;
        catalog.validate_unique_keys()?;
        Ok(catalog)
    }

    /// Find the entry describing (index, sub)
    pub fn find(&self, index: u16, sub: u8) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.index == index && e.sub == sub)
    }

    fn validate_unique_keys(&self) -> Result<(), LoadError> {
        let mut found = HashMap::new();
        for entry in &self.entries {
            if found.contains_key(&(entry.index, entry.sub)) {
                return DuplicateEntriesSnafu {
                    index: entry.index,
                    sub: entry.sub,
                }
                .fail();
            }
            found.insert((entry.index, entry.sub), ());
        }
        Ok(())
    }
}

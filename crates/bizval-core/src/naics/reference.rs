use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::node::MultiplierBand;
use crate::types::Multiple;
use crate::{BizValError, BizValResult};

/// One row of the NAICS multiplier reference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaicsEntry {
    pub code: String,
    pub title: String,
    /// Immediate ancestor. When omitted for a code deeper than a sector, the
    /// longest existing prefix is used.
    #[serde(default, alias = "sectorCode", skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_multiplier: Option<Multiple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_multiplier: Option<Multiple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_multiplier: Option<Multiple>,
}

impl NaicsEntry {
    /// The entry's multiplier band. The three multiplier columns are
    /// all-or-nothing.
    pub fn band(&self) -> BizValResult<Option<MultiplierBand>> {
        match (self.min_multiplier, self.avg_multiplier, self.max_multiplier) {
            (None, None, None) => Ok(None),
            (Some(min), Some(avg), Some(max)) => {
                let band = MultiplierBand { min, avg, max };
                band.validate(&self.code)?;
                Ok(Some(band))
            }
            _ => Err(BizValError::Config {
                code: self.code.clone(),
                reason: "minMultiplier, avgMultiplier and maxMultiplier must be given together"
                    .into(),
            }),
        }
    }
}

/// A complete reference dataset as loaded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaicsTable {
    /// Classification edition label, e.g. "NAICS 2012".
    pub edition: String,
    /// Date the multiplier survey was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub entries: Vec<NaicsEntry>,
}

#[cfg(feature = "builtin-naics")]
const BUILTIN_TABLE: &str = include_str!("../../data/naics_multipliers.json");

impl NaicsTable {
    pub fn from_json_str(s: &str) -> BizValResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> BizValResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Read a table from disk. `.yaml`/`.yml` files are parsed as YAML,
    /// anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> BizValResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BizValError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let table = if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        };
        table.map_err(|e| {
            BizValError::Serialization(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }

    /// The multiplier table shipped with the crate.
    #[cfg(feature = "builtin-naics")]
    pub fn builtin() -> BizValResult<Self> {
        Self::from_json_str(BUILTIN_TABLE)
    }
}

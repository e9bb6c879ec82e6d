use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Multiple;
use crate::{BizValError, BizValResult};

/// Shortest NAICS code (two-digit sector).
pub const MIN_CODE_LEN: usize = 2;
/// Longest NAICS code (six-digit national industry).
pub const MAX_CODE_LEN: usize = 6;

/// EBITDA multiple range for an industry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierBand {
    pub min: Multiple,
    pub avg: Multiple,
    pub max: Multiple,
}

impl MultiplierBand {
    /// Band applied when no industry classification resolves.
    pub const GENERIC: MultiplierBand = MultiplierBand {
        min: dec!(3.0),
        avg: dec!(4.0),
        max: dec!(5.0),
    };

    /// Build a band, rejecting inverted or negative bounds.
    pub fn new(min: Multiple, avg: Multiple, max: Multiple) -> BizValResult<Self> {
        let band = MultiplierBand { min, avg, max };
        band.validate("")?;
        Ok(band)
    }

    /// Check `0 <= min <= avg <= max`; `code` labels the error.
    pub fn validate(&self, code: &str) -> BizValResult<()> {
        if self.min > self.max {
            return Err(BizValError::Config {
                code: code.into(),
                reason: format!(
                    "minMultiplier ({}) is greater than maxMultiplier ({})",
                    self.min, self.max
                ),
            });
        }
        if self.avg < self.min || self.avg > self.max {
            return Err(BizValError::Config {
                code: code.into(),
                reason: format!(
                    "avgMultiplier ({}) lies outside [{}, {}]",
                    self.avg, self.min, self.max
                ),
            });
        }
        if self.min < Decimal::ZERO {
            return Err(BizValError::Config {
                code: code.into(),
                reason: format!("minMultiplier ({}) is negative", self.min),
            });
        }
        Ok(())
    }

    pub fn width(&self) -> Multiple {
        self.max - self.min
    }
}

impl std::fmt::Display for MultiplierBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x / {}x / {}x", self.min, self.avg, self.max)
    }
}

/// One level of the NAICS classification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaicsNode {
    pub code: String,
    pub title: String,
    /// 2 (sector) through 6 (national industry); equals the code length.
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<MultiplierBand>,
}

impl NaicsNode {
    pub fn is_sector(&self) -> bool {
        self.level as usize == MIN_CODE_LEN
    }

    pub fn is_national_industry(&self) -> bool {
        self.level as usize == MAX_CODE_LEN
    }
}

/// A well-formed NAICS code is 2 to 6 ASCII digits.
pub fn is_valid_code(code: &str) -> bool {
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit())
}

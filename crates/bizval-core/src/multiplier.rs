use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::naics::{MultiplierBand, NaicsIndex};
use crate::types::{Multiple, Score};

// ---------------------------------------------------------------------------
// Tier thresholds
// ---------------------------------------------------------------------------

const TOP_TIER_FLOOR: Score = dec!(90);
const UPPER_TIER_FLOOR: Score = dec!(80);
const MIDDLE_TIER_FLOOR: Score = dec!(70);
const LOWER_TIER_FLOOR: Score = dec!(60);

/// Share of the avg-to-max gap awarded in the upper tier.
const UPPER_TIER_UPLIFT: Multiple = dec!(0.7);
/// Share of the min-to-avg gap deducted in the lower tier.
const LOWER_TIER_DISCOUNT: Multiple = dec!(0.5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Position within a multiplier band selected by the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiplierTier {
    /// score >= 90
    Max,
    /// 80 <= score < 90
    UpperMid,
    /// 70 <= score < 80
    Average,
    /// 60 <= score < 70
    LowerMid,
    /// score < 60
    Min,
}

impl MultiplierTier {
    pub fn for_score(score: Score) -> Self {
        if score >= TOP_TIER_FLOOR {
            MultiplierTier::Max
        } else if score >= UPPER_TIER_FLOOR {
            MultiplierTier::UpperMid
        } else if score >= MIDDLE_TIER_FLOOR {
            MultiplierTier::Average
        } else if score >= LOWER_TIER_FLOOR {
            MultiplierTier::LowerMid
        } else {
            MultiplierTier::Min
        }
    }

    /// Point multiple for this tier. Upside moves 70% of the way to `max`,
    /// downside only 50% of the way to `min`.
    pub fn apply(self, band: &MultiplierBand) -> Multiple {
        match self {
            MultiplierTier::Max => band.max,
            MultiplierTier::UpperMid => band.avg + (band.max - band.avg) * UPPER_TIER_UPLIFT,
            MultiplierTier::Average => band.avg,
            MultiplierTier::LowerMid => band.avg - (band.avg - band.min) * LOWER_TIER_DISCOUNT,
            MultiplierTier::Min => band.min,
        }
    }
}

impl std::fmt::Display for MultiplierTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Max => write!(f, "Max"),
            Self::UpperMid => write!(f, "Upper Mid"),
            Self::Average => write!(f, "Average"),
            Self::LowerMid => write!(f, "Lower Mid"),
            Self::Min => write!(f, "Min"),
        }
    }
}

/// The NAICS node whose band priced the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryMatch {
    /// Code supplied with the assessment
    pub requested_code: String,
    /// Code of the node that carried the band
    pub matched_code: String,
    pub title: String,
    pub level: u8,
    /// False when the band came from an ancestor of the requested code
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierResolution {
    pub multiplier: Multiple,
    pub band: MultiplierBand,
    pub tier: MultiplierTier,
    /// `None` when the generic default band was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<IndustryMatch>,
}

/// Point multiple for a band at a given score.
pub fn multiplier_for_band(band: &MultiplierBand, score: Score) -> Multiple {
    MultiplierTier::for_score(score).apply(band)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Maps `(NAICS code, composite score)` to one concrete EBITDA multiple.
#[derive(Debug, Clone)]
pub struct MultiplierResolver {
    index: Arc<NaicsIndex>,
}

impl MultiplierResolver {
    pub fn new(index: Arc<NaicsIndex>) -> Self {
        MultiplierResolver { index }
    }

    pub fn index(&self) -> &NaicsIndex {
        &self.index
    }

    /// Band for `code`, walking up the hierarchy. Absent, malformed or
    /// unknown codes yield `None`.
    pub fn industry_band(&self, code: Option<&str>) -> Option<(MultiplierBand, IndustryMatch)> {
        let requested = code.map(str::trim).filter(|c| !c.is_empty())?;
        let node = self.index.lookup_with_fallback(requested)?;
        let band = node.band?;
        Some((
            band,
            IndustryMatch {
                requested_code: requested.to_string(),
                matched_code: node.code.clone(),
                title: node.title.clone(),
                level: node.level,
                exact: node.code == requested,
            },
        ))
    }

    pub fn resolve(&self, code: Option<&str>, score: Score) -> Multiple {
        self.resolve_detailed(code, score).multiplier
    }

    pub fn resolve_detailed(&self, code: Option<&str>, score: Score) -> MultiplierResolution {
        let (band, industry) = match self.industry_band(code) {
            Some((band, m)) => (band, Some(m)),
            None => (MultiplierBand::GENERIC, None),
        };
        let tier = MultiplierTier::for_score(score);
        let multiplier = tier.apply(&band);

        tracing::debug!(
            code = code.unwrap_or(""),
            matched = industry.as_ref().map(|m| m.matched_code.as_str()).unwrap_or("generic"),
            %score,
            %tier,
            %multiplier,
            "multiplier resolved"
        );

        MultiplierResolution {
            multiplier,
            band,
            tier,
            industry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naics::{NaicsEntry, NaicsTable};
    use rust_decimal::Decimal;

    fn band() -> MultiplierBand {
        MultiplierBand {
            min: dec!(3.0),
            avg: dec!(4.0),
            max: dec!(6.0),
        }
    }

    fn entry(code: &str, band: Option<(Decimal, Decimal, Decimal)>) -> NaicsEntry {
        NaicsEntry {
            code: code.into(),
            title: format!("Industry {code}"),
            parent_code: None,
            min_multiplier: band.map(|b| b.0),
            avg_multiplier: band.map(|b| b.1),
            max_multiplier: band.map(|b| b.2),
        }
    }

    fn resolver() -> MultiplierResolver {
        let index = NaicsIndex::from_table(NaicsTable {
            edition: "test".into(),
            as_of: None,
            entries: vec![
                entry("23", None),
                entry("236", Some((dec!(2.5), dec!(3.5), dec!(5.0)))),
                entry("236110", Some((dec!(3.0), dec!(4.0), dec!(6.0)))),
            ],
        })
        .unwrap();
        MultiplierResolver::new(Arc::new(index))
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(MultiplierTier::for_score(dec!(90)), MultiplierTier::Max);
        assert_eq!(MultiplierTier::for_score(dec!(89.99)), MultiplierTier::UpperMid);
        assert_eq!(MultiplierTier::for_score(dec!(80)), MultiplierTier::UpperMid);
        assert_eq!(MultiplierTier::for_score(dec!(79.99)), MultiplierTier::Average);
        assert_eq!(MultiplierTier::for_score(dec!(70)), MultiplierTier::Average);
        assert_eq!(MultiplierTier::for_score(dec!(69.99)), MultiplierTier::LowerMid);
        assert_eq!(MultiplierTier::for_score(dec!(60)), MultiplierTier::LowerMid);
        assert_eq!(MultiplierTier::for_score(dec!(59.99)), MultiplierTier::Min);
    }

    #[test]
    fn test_tier_formulas() {
        let b = band();
        assert_eq!(multiplier_for_band(&b, dec!(95)), dec!(6.0));
        // 4.0 + (6.0 - 4.0) * 0.7 = 5.4
        assert_eq!(multiplier_for_band(&b, dec!(82)), dec!(5.4));
        assert_eq!(multiplier_for_band(&b, dec!(74)), dec!(4.0));
        // 4.0 - (4.0 - 3.0) * 0.5 = 3.5
        assert_eq!(multiplier_for_band(&b, dec!(65)), dec!(3.5));
        assert_eq!(multiplier_for_band(&b, dec!(50)), dec!(3.0));
    }

    #[test]
    fn test_asymmetry_preserved() {
        let b = band();
        let upside = multiplier_for_band(&b, dec!(85)) - b.avg;
        let downside = b.avg - multiplier_for_band(&b, dec!(65));
        assert_eq!(upside, dec!(1.4));
        assert_eq!(downside, dec!(0.5));
    }

    #[test]
    fn test_generic_band_when_code_absent() {
        let r = resolver();
        let res = r.resolve_detailed(None, dec!(95));
        assert_eq!(res.multiplier, dec!(5.0));
        assert_eq!(res.band, MultiplierBand::GENERIC);
        assert!(res.industry.is_none());
        assert_eq!(r.resolve(None, dec!(50)), dec!(3.0));
        assert_eq!(r.resolve(Some("   "), dec!(74)), dec!(4.0));
    }

    #[test]
    fn test_generic_band_when_code_unknown() {
        let r = resolver();
        assert_eq!(r.resolve(Some("999999"), dec!(82)), dec!(4.7));
        assert_eq!(r.resolve(Some("not-a-code"), dec!(65)), dec!(3.5));
    }

    #[test]
    fn test_exact_industry_match() {
        let r = resolver();
        let res = r.resolve_detailed(Some("236110"), dec!(82));
        assert_eq!(res.multiplier, dec!(5.4));
        assert_eq!(res.tier, MultiplierTier::UpperMid);
        let m = res.industry.unwrap();
        assert!(m.exact);
        assert_eq!(m.matched_code, "236110");
        assert_eq!(m.level, 6);
    }

    #[test]
    fn test_ancestor_industry_match() {
        let r = resolver();
        let res = r.resolve_detailed(Some("236220"), dec!(95));
        assert_eq!(res.multiplier, dec!(5.0));
        let m = res.industry.unwrap();
        assert!(!m.exact);
        assert_eq!(m.requested_code, "236220");
        assert_eq!(m.matched_code, "236");
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::ebitda::{adjusted_ebitda, base_ebitda, out_of_range};
use crate::grading::{score_drivers, Grade, GradeSummary};
use crate::intake::{ValuationForm, ValuationInput};
use crate::multiplier::{IndustryMatch, MultiplierResolver, MultiplierTier};
use crate::naics::{MultiplierBand, NaicsIndex};
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Score};
use crate::BizValResult;

// ---------------------------------------------------------------------------
// Range derivation
// ---------------------------------------------------------------------------

/// Low estimate as a share of the mid estimate.
pub const LOW_RANGE_FACTOR: Decimal = dec!(0.8);
/// High estimate as a share of the mid estimate.
pub const HIGH_RANGE_FACTOR: Decimal = dec!(1.2);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Estimated enterprise value range for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub base_ebitda: Money,
    pub adjusted_ebitda: Money,
    pub composite_score: Score,
    pub overall_grade: Grade,
    pub multiplier: Multiple,
    pub low: Money,
    pub mid: Money,
    pub high: Money,
    /// Band the multiplier was taken from
    pub band: MultiplierBand,
    pub tier: MultiplierTier,
    /// `None` when the generic default band was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<IndustryMatch>,
    pub grades: GradeSummary,
}

/// Output contract written to the assessment record and the PDF report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub base_ebitda: Money,
    pub adjusted_ebitda: Money,
    /// Overall letter grade
    pub overall_score: Grade,
    pub composite_score: Score,
    pub valuation_multiple: Multiple,
    pub low_estimate: Money,
    pub mid_estimate: Money,
    pub high_estimate: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naics_code: Option<String>,
}

impl ValuationResult {
    pub fn to_record(&self) -> AssessmentRecord {
        AssessmentRecord {
            base_ebitda: self.base_ebitda,
            adjusted_ebitda: self.adjusted_ebitda,
            overall_score: self.overall_grade,
            composite_score: self.composite_score,
            valuation_multiple: self.multiplier,
            low_estimate: self.low,
            mid_estimate: self.mid,
            high_estimate: self.high,
            naics_code: self.industry.as_ref().map(|m| m.matched_code.clone()),
        }
    }
}

/// `(low, mid, high)` for an adjusted EBITDA and a point multiple. Fails
/// with a validation error when the estimate does not fit a `Decimal`.
pub fn valuation_range(
    adjusted_ebitda: Money,
    multiplier: Multiple,
) -> BizValResult<(Money, Money, Money)> {
    let mid = adjusted_ebitda
        .checked_mul(multiplier)
        .ok_or_else(|| out_of_range("adjustedEbitda"))?;
    let low = mid
        .checked_mul(LOW_RANGE_FACTOR)
        .ok_or_else(|| out_of_range("adjustedEbitda"))?;
    let high = mid
        .checked_mul(HIGH_RANGE_FACTOR)
        .ok_or_else(|| out_of_range("adjustedEbitda"))?;
    Ok((low, mid, high))
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless valuation pipeline over a shared, read-only NAICS index.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    resolver: MultiplierResolver,
}

impl ValuationEngine {
    pub fn new(index: Arc<NaicsIndex>) -> Self {
        ValuationEngine {
            resolver: MultiplierResolver::new(index),
        }
    }

    /// Engine over the multiplier table shipped with the crate.
    #[cfg(feature = "builtin-naics")]
    pub fn with_builtin_index() -> BizValResult<Self> {
        Ok(Self::new(Arc::new(NaicsIndex::builtin()?)))
    }

    pub fn index(&self) -> &NaicsIndex {
        self.resolver.index()
    }

    pub fn resolver(&self) -> &MultiplierResolver {
        &self.resolver
    }

    /// Run the full valuation for a validated input.
    pub fn compute_valuation(
        &self,
        input: &ValuationInput,
    ) -> BizValResult<ComputationOutput<ValuationResult>> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();
        let result = self.valuate(input, &mut warnings)?;
        let elapsed = start.elapsed().as_micros() as u64;

        let assumptions = serde_json::json!({
            "input": input,
            "base_ebitda": "net income + interest + taxes + depreciation + amortization",
            "adjusted_ebitda": "base EBITDA + owner salary + personal + one-time + other adjustments",
            "composite_score": "equal-weighted mean of ten driver scores (A=95, B=85, C=75, D=65, F=50)",
            "multiplier_tiers": ">=90 max; 80-90 avg+0.7*(max-avg); 70-80 avg; 60-70 avg-0.5*(avg-min); <60 min",
            "range": { "low": LOW_RANGE_FACTOR, "mid": Decimal::ONE, "high": HIGH_RANGE_FACTOR },
            "naics_edition": self.index().edition(),
        });

        Ok(with_metadata(
            "Adjusted EBITDA x Industry Multiple",
            &assumptions,
            warnings,
            elapsed,
            result,
        ))
    }

    /// Validate a submitted form, then value it. Missing or illegal grades
    /// fail before any computation.
    pub fn compute_from_form(
        &self,
        form: &ValuationForm,
    ) -> BizValResult<ComputationOutput<ValuationResult>> {
        let input = form.validate()?;
        let mut output = self.compute_valuation(&input)?;

        let unparsed: Vec<String> = form
            .unparsed_amounts()
            .into_iter()
            .map(|field| format!("{field} is not a number and was treated as 0"))
            .collect();
        if !unparsed.is_empty() {
            tracing::debug!(fields = unparsed.len(), "non-numeric amounts coerced to zero");
            output.prepend_warnings(unparsed);
        }
        Ok(output)
    }

    fn valuate(
        &self,
        input: &ValuationInput,
        warnings: &mut Vec<String>,
    ) -> BizValResult<ValuationResult> {
        let base = base_ebitda(&input.financials)?;
        let adjusted = adjusted_ebitda(&input.financials, &input.adjustments)?;
        if adjusted <= Decimal::ZERO {
            warnings.push(format!(
                "Adjusted EBITDA is {adjusted}; an earnings multiple does not produce a meaningful value"
            ));
        }

        let grades = score_drivers(&input.grades)?;

        let code = input.naics_code.as_deref();
        let resolution = self.resolver.resolve_detailed(code, grades.composite_score);
        match (code, &resolution.industry) {
            (None, _) => warnings.push(format!(
                "No NAICS code supplied; generic band {} applied",
                resolution.band
            )),
            (Some(c), None) => warnings.push(format!(
                "NAICS code '{c}' did not resolve to an industry band; generic band {} applied",
                resolution.band
            )),
            (Some(_), Some(m)) if !m.exact => warnings.push(format!(
                "NAICS code '{}' has no band of its own; using '{}' {} (level {})",
                m.requested_code, m.matched_code, m.title, m.level
            )),
            _ => {}
        }

        let (low, mid, high) = valuation_range(adjusted, resolution.multiplier)?;

        tracing::debug!(
            %adjusted,
            score = %grades.composite_score,
            grade = %grades.overall_grade,
            multiplier = %resolution.multiplier,
            %mid,
            "valuation computed"
        );

        Ok(ValuationResult {
            base_ebitda: base,
            adjusted_ebitda: adjusted,
            composite_score: grades.composite_score,
            overall_grade: grades.overall_grade,
            multiplier: resolution.multiplier,
            low,
            mid,
            high,
            band: resolution.band,
            tier: resolution.tier,
            industry: resolution.industry,
            grades,
        })
    }
}

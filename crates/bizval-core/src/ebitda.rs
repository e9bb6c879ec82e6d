use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::Money;
use crate::{BizValError, BizValResult};

/// Income statement lines reconciling net income back to EBITDA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub net_income: Money,
    pub interest: Money,
    pub taxes: Money,
    pub depreciation: Money,
    pub amortization: Money,
}

/// Owner add-backs and normalising adjustments. Any line may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAdjustments {
    pub owner_salary: Money,
    pub personal_expenses: Money,
    pub one_time_expenses: Money,
    pub other_adjustments: Money,
}

impl FinancialStatement {
    pub fn total(&self) -> BizValResult<Money> {
        checked_sum(
            "financials",
            &[
                self.net_income,
                self.interest,
                self.taxes,
                self.depreciation,
                self.amortization,
            ],
        )
    }
}

impl OwnerAdjustments {
    pub fn total(&self) -> BizValResult<Money> {
        checked_sum(
            "adjustments",
            &[
                self.owner_salary,
                self.personal_expenses,
                self.one_time_expenses,
                self.other_adjustments,
            ],
        )
    }
}

/// Sum that reports overflow instead of panicking. Each amount alone fits a
/// `Decimal`; their sum may not.
fn checked_sum(field: &str, lines: &[Money]) -> BizValResult<Money> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(*line))
        .ok_or_else(|| out_of_range(field))
}

pub(crate) fn out_of_range(field: &str) -> BizValError {
    BizValError::Validation {
        field: field.into(),
        reason: "amount out of range".into(),
    }
}

/// Parse a form amount. Blank, missing or non-numeric text becomes zero.
///
/// Accepts `$`, thousands separators and accounting negatives, so
/// `"$(1,250.50)"` parses as `-1250.50`.
pub fn parse_amount(raw: Option<&str>) -> Money {
    try_parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_amount`] but reports text that could not be read.
/// Blank or missing input is `Some(0)`.
pub fn try_parse_amount(raw: Option<&str>) -> Option<Money> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Some(Decimal::ZERO),
        Some(t) => t,
    };

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let (negative, body) = match cleaned.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };
    if body.is_empty() {
        return None;
    }

    let value = Decimal::from_str(body)
        .or_else(|_| Decimal::from_scientific(body))
        .ok()?;
    Some(if negative { -value } else { value })
}

/// Net income plus interest, taxes, depreciation and amortization.
pub fn base_ebitda(statement: &FinancialStatement) -> BizValResult<Money> {
    statement.total()
}

/// Base EBITDA plus owner adjustments. No floor at zero.
pub fn adjusted_ebitda(
    statement: &FinancialStatement,
    adjustments: &OwnerAdjustments,
) -> BizValResult<Money> {
    base_ebitda(statement)?
        .checked_add(adjustments.total()?)
        .ok_or_else(|| out_of_range("adjustedEbitda"))
}

//! Intake boundary: the loosely typed assessment form submitted by the web
//! application, and its validation into a total `ValuationInput`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ebitda::{parse_amount, try_parse_amount, FinancialStatement, OwnerAdjustments};
use crate::grading::{Grade, ValueDriver, ValueDriverGrades};
use crate::{BizValError, BizValResult};

/// Validated, fully typed valuation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub financials: FinancialStatement,
    pub adjustments: OwnerAdjustments,
    pub grades: ValueDriverGrades,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics_code: Option<String>,
}

/// Assessment as persisted by the web application. Amounts are decimal
/// strings (numbers and null are tolerated); grades are letters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationForm {
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub net_income: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub taxes: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub amortization: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub owner_salary: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub personal_expenses: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub one_time_expenses: Option<String>,
    #[serde(default, deserialize_with = "amount_text", skip_serializing_if = "Option::is_none")]
    pub other_adjustments: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_potential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_concentration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_dependence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_systems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_satisfaction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics_code: Option<String>,
}

fn amount_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

impl ValuationForm {
    /// Raw text of a driver's grade field.
    pub fn grade_text(&self, driver: ValueDriver) -> Option<&str> {
        let field = match driver {
            ValueDriver::FinancialPerformance => &self.financial_performance,
            ValueDriver::GrowthPotential => &self.growth_potential,
            ValueDriver::RecurringRevenue => &self.recurring_revenue,
            ValueDriver::CustomerConcentration => &self.customer_concentration,
            ValueDriver::ManagementTeam => &self.management_team,
            ValueDriver::OwnerDependence => &self.owner_dependence,
            ValueDriver::CompetitivePosition => &self.competitive_position,
            ValueDriver::OperationalSystems => &self.operational_systems,
            ValueDriver::MarketConditions => &self.market_conditions,
            ValueDriver::CustomerSatisfaction => &self.customer_satisfaction,
        };
        field.as_deref()
    }

    pub fn set_grade(&mut self, driver: ValueDriver, grade: impl Into<String>) {
        let value = Some(grade.into());
        match driver {
            ValueDriver::FinancialPerformance => self.financial_performance = value,
            ValueDriver::GrowthPotential => self.growth_potential = value,
            ValueDriver::RecurringRevenue => self.recurring_revenue = value,
            ValueDriver::CustomerConcentration => self.customer_concentration = value,
            ValueDriver::ManagementTeam => self.management_team = value,
            ValueDriver::OwnerDependence => self.owner_dependence = value,
            ValueDriver::CompetitivePosition => self.competitive_position = value,
            ValueDriver::OperationalSystems => self.operational_systems = value,
            ValueDriver::MarketConditions => self.market_conditions = value,
            ValueDriver::CustomerSatisfaction => self.customer_satisfaction = value,
        }
    }

    /// Amount fields as `(persisted field name, raw text)`.
    pub fn amount_fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("netIncome", self.net_income.as_deref()),
            ("interest", self.interest.as_deref()),
            ("taxes", self.taxes.as_deref()),
            ("depreciation", self.depreciation.as_deref()),
            ("amortization", self.amortization.as_deref()),
            ("ownerSalary", self.owner_salary.as_deref()),
            ("personalExpenses", self.personal_expenses.as_deref()),
            ("oneTimeExpenses", self.one_time_expenses.as_deref()),
            ("otherAdjustments", self.other_adjustments.as_deref()),
        ]
    }

    /// Amount fields holding text that is not a number. They count as zero.
    pub fn unparsed_amounts(&self) -> Vec<&'static str> {
        self.amount_fields()
            .into_iter()
            .filter(|(_, raw)| try_parse_amount(*raw).is_none())
            .map(|(name, _)| name)
            .collect()
    }

    /// Statement lines, unreadable amounts as zero.
    pub fn financials(&self) -> FinancialStatement {
        FinancialStatement {
            net_income: parse_amount(self.net_income.as_deref()),
            interest: parse_amount(self.interest.as_deref()),
            taxes: parse_amount(self.taxes.as_deref()),
            depreciation: parse_amount(self.depreciation.as_deref()),
            amortization: parse_amount(self.amortization.as_deref()),
        }
    }

    /// Owner adjustments, unreadable amounts as zero.
    pub fn adjustments(&self) -> OwnerAdjustments {
        OwnerAdjustments {
            owner_salary: parse_amount(self.owner_salary.as_deref()),
            personal_expenses: parse_amount(self.personal_expenses.as_deref()),
            one_time_expenses: parse_amount(self.one_time_expenses.as_deref()),
            other_adjustments: parse_amount(self.other_adjustments.as_deref()),
        }
    }

    /// Check that every grade is present and legal, and parse all amounts.
    pub fn validate(&self) -> BizValResult<ValuationInput> {
        let mut missing: Vec<&'static str> = Vec::new();
        let mut parsed: Vec<Grade> = Vec::with_capacity(ValueDriver::ALL.len());

        for driver in ValueDriver::ALL {
            match self.grade_text(driver).map(str::trim).filter(|t| !t.is_empty()) {
                None => missing.push(driver.field_name()),
                Some(text) => {
                    let grade = text.parse::<Grade>().map_err(|_| BizValError::InvalidGrade {
                        field: driver.field_name().into(),
                        reason: format!("'{text}' is not one of A, B, C, D, F"),
                    })?;
                    parsed.push(grade);
                }
            }
        }

        if !missing.is_empty() {
            return Err(BizValError::Validation {
                field: missing.join(", "),
                reason: format!(
                    "all {} value-driver grades are required; {} missing",
                    ValueDriver::ALL.len(),
                    missing.len()
                ),
            });
        }

        let grades: [Grade; 10] = parsed.try_into().map_err(|_| BizValError::Validation {
            field: "grades".into(),
            reason: "expected exactly ten value-driver grades".into(),
        })?;

        Ok(ValuationInput {
            financials: self.financials(),
            adjustments: self.adjustments(),
            grades: ValueDriverGrades::from_array(grades),
            naics_code: self
                .naics_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        })
    }
}

impl TryFrom<&ValuationForm> for ValuationInput {
    type Error = BizValError;

    fn try_from(form: &ValuationForm) -> Result<Self, Self::Error> {
        form.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn full_form() -> ValuationForm {
        let mut form = ValuationForm {
            net_income: Some("400,000".into()),
            interest: Some("50000".into()),
            taxes: Some("100000".into()),
            depreciation: None,
            amortization: Some("".into()),
            owner_salary: Some("$150,000".into()),
            naics_code: Some(" 236110 ".into()),
            ..Default::default()
        };
        for driver in ValueDriver::ALL {
            form.set_grade(driver, "B");
        }
        form
    }

    #[test]
    fn test_validate_full_form() {
        let input = full_form().validate().unwrap();
        assert_eq!(input.financials.net_income, dec!(400000));
        assert_eq!(input.financials.depreciation, dec!(0));
        assert_eq!(input.financials.amortization, dec!(0));
        assert_eq!(input.adjustments.owner_salary, dec!(150000));
        assert_eq!(input.grades, ValueDriverGrades::uniform(Grade::B));
        assert_eq!(input.naics_code.as_deref(), Some("236110"));
    }

    #[test]
    fn test_missing_grade_is_validation_error() {
        let mut form = full_form();
        form.management_team = None;
        form.customer_satisfaction = Some("  ".into());
        match form.validate().unwrap_err() {
            BizValError::Validation { field, reason } => {
                assert_eq!(field, "managementTeam, customerSatisfaction");
                assert!(reason.contains("2 missing"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_letter_is_invalid_grade() {
        let mut form = full_form();
        form.set_grade(ValueDriver::GrowthPotential, "E");
        match form.validate().unwrap_err() {
            BizValError::InvalidGrade { field, reason } => {
                assert_eq!(field, "growthPotential");
                assert!(reason.contains("'E'"));
            }
            other => panic!("expected InvalidGrade error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_naics_is_none() {
        let mut form = full_form();
        form.naics_code = Some("   ".into());
        assert_eq!(form.validate().unwrap().naics_code, None);
    }

    #[test]
    fn test_unparsed_amounts_reported() {
        let mut form = full_form();
        form.taxes = Some("unknown".into());
        form.other_adjustments = Some("12 thousand".into());
        assert_eq!(form.unparsed_amounts(), vec!["taxes", "otherAdjustments"]);
        let input = form.validate().unwrap();
        assert_eq!(input.financials.taxes, dec!(0));
    }

    #[test]
    fn test_deserialize_persisted_schema() {
        let form: ValuationForm = serde_json::from_value(serde_json::json!({
            "netIncome": "250000.50",
            "interest": 12000,
            "taxes": null,
            "ownerSalary": "90000",
            "financialPerformance": "A",
            "growthPotential": "b",
            "recurringRevenue": "C",
            "customerConcentration": "D",
            "managementTeam": "F",
            "ownerDependence": "A",
            "competitivePosition": "B",
            "operationalSystems": "C",
            "marketConditions": "D",
            "customerSatisfaction": "F",
            "naicsCode": "541511",
            "leadId": "ignored"
        }))
        .unwrap();
        assert_eq!(form.interest.as_deref(), Some("12000"));
        assert!(form.taxes.is_none());

        let input = ValuationInput::try_from(&form).unwrap();
        assert_eq!(input.financials.net_income, dec!(250000.50));
        assert_eq!(input.financials.interest, dec!(12000));
        assert_eq!(input.grades.growth_potential, Grade::B);
        assert_eq!(input.grades.customer_satisfaction, Grade::F);
    }

    #[test]
    fn test_amount_helpers_need_no_grades() {
        let form = ValuationForm {
            net_income: Some("$250,000".into()),
            depreciation: Some("n/a".into()),
            owner_salary: Some("90000".into()),
            other_adjustments: Some("(10,000)".into()),
            ..Default::default()
        };
        let fs = form.financials();
        assert_eq!(fs.net_income, dec!(250000));
        assert_eq!(fs.depreciation, dec!(0));
        let adj = form.adjustments();
        assert_eq!(adj.owner_salary, dec!(90000));
        assert_eq!(adj.other_adjustments, dec!(-10000));
        assert!(form.validate().is_err());
    }
}

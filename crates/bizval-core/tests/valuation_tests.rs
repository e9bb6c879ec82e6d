use bizval_core::ebitda::{FinancialStatement, OwnerAdjustments};
use bizval_core::grading::{Grade, ValueDriver, ValueDriverGrades};
use bizval_core::multiplier::MultiplierTier;
use bizval_core::{BizValError, ValuationEngine, ValuationForm, ValuationInput};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn engine() -> ValuationEngine {
    ValuationEngine::with_builtin_index().unwrap()
}

/// Adjusted EBITDA of exactly 1,000,000 split across statement and add-backs.
fn million_ebitda(grades: ValueDriverGrades, naics: Option<&str>) -> ValuationInput {
    ValuationInput {
        financials: FinancialStatement {
            net_income: dec!(520000),
            interest: dec!(40000),
            taxes: dec!(140000),
            depreciation: dec!(60000),
            amortization: dec!(15000),
        },
        adjustments: OwnerAdjustments {
            owner_salary: dec!(180000),
            personal_expenses: dec!(22000),
            one_time_expenses: dec!(35000),
            other_adjustments: dec!(-12000),
        },
        grades,
        naics_code: naics.map(String::from),
    }
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn test_scenario_all_a_unresolved_code() {
    let input = million_ebitda(ValueDriverGrades::uniform(Grade::A), Some("999999"));
    let out = engine().compute_valuation(&input).unwrap();
    let r = &out.result;

    assert_eq!(r.base_ebitda, dec!(775000));
    assert_eq!(r.adjusted_ebitda, dec!(1000000));
    assert_eq!(r.composite_score, dec!(95));
    assert_eq!(r.multiplier, dec!(5.0));
    assert_eq!(r.mid, dec!(5000000));
    assert_eq!(r.low, dec!(4000000));
    assert_eq!(r.high, dec!(6000000));
    assert_eq!(r.overall_grade, Grade::A);
    assert!(r.industry.is_none());
}

#[test]
fn test_scenario_all_f_unresolved_code() {
    let input = million_ebitda(ValueDriverGrades::uniform(Grade::F), Some("999999"));
    let r = engine().compute_valuation(&input).unwrap().result;

    assert_eq!(r.composite_score, dec!(50));
    assert_eq!(r.multiplier, dec!(3.0));
    assert_eq!(r.mid, dec!(3000000));
    assert_eq!(r.overall_grade, Grade::F);
    assert_eq!(r.tier, MultiplierTier::Min);
}

#[test]
fn test_scenario_mixed_grades_average_tier() {
    let grades = ValueDriverGrades::from_array([
        Grade::A,
        Grade::A,
        Grade::B,
        Grade::B,
        Grade::C,
        Grade::C,
        Grade::D,
        Grade::D,
        Grade::F,
        Grade::F,
    ]);
    let input = million_ebitda(grades, Some("541511"));
    let r = engine().compute_valuation(&input).unwrap().result;

    assert_eq!(r.composite_score, dec!(74));
    assert_eq!(r.overall_grade, Grade::C);
    assert_eq!(r.tier, MultiplierTier::Average);
    assert_eq!(r.multiplier, r.band.avg);
    assert_eq!(r.multiplier, dec!(5.5));
    assert_eq!(r.grades.weakest_drivers.len(), 4);
}

#[test]
fn test_scenario_residential_construction_upper_tier() {
    // 95 + 6*85 + 2*75 + 65 = 820 -> composite 82
    let grades = ValueDriverGrades::from_array([
        Grade::A,
        Grade::B,
        Grade::B,
        Grade::B,
        Grade::B,
        Grade::B,
        Grade::B,
        Grade::C,
        Grade::C,
        Grade::D,
    ]);
    let input = million_ebitda(grades, Some("236110"));
    let out = engine().compute_valuation(&input).unwrap();
    let r = &out.result;

    assert_eq!(r.composite_score, dec!(82));
    assert_eq!(r.tier, MultiplierTier::UpperMid);
    let band = r.band;
    assert_eq!(r.multiplier, band.avg + (band.max - band.avg) * dec!(0.7));
    assert_eq!(r.multiplier, dec!(5.4));
    assert_eq!(r.mid, dec!(5400000));
    assert_eq!(r.overall_grade, Grade::B);
    assert!(r.industry.as_ref().unwrap().exact);
    assert!(out.warnings.is_empty(), "unexpected warnings: {:?}", out.warnings);
}

#[test]
fn test_scenario_sector_fallback() {
    // 236999 is not in the table; neither is 23699 or 2369. 236 carries a band.
    let input = million_ebitda(ValueDriverGrades::uniform(Grade::C), Some("236999"));
    let out = engine().compute_valuation(&input).unwrap();
    let r = &out.result;

    let industry = r.industry.as_ref().unwrap();
    assert_eq!(industry.matched_code, "236");
    assert!(!industry.exact);
    assert_eq!(r.multiplier, dec!(3.5));
    assert!(out.warnings.iter().any(|w| w.contains("'236'")));
}

// ===========================================================================
// Range and determinism properties on fixed inputs
// ===========================================================================

#[test]
fn test_range_ratios_exact() {
    let input = million_ebitda(ValueDriverGrades::uniform(Grade::B), Some("722511"));
    let r = engine().compute_valuation(&input).unwrap().result;

    assert!(r.low <= r.mid && r.mid <= r.high);
    assert_eq!(r.low, r.mid * dec!(0.8));
    assert_eq!(r.high, r.mid * dec!(1.2));
    assert_eq!(r.mid / r.low, dec!(1.25));
    assert_eq!(r.high / r.mid, dec!(1.2));
}

#[test]
fn test_repeated_calls_identical() {
    let e = engine();
    let input = million_ebitda(ValueDriverGrades::uniform(Grade::B), Some("541330"));
    let first = e.compute_valuation(&input).unwrap();
    let second = e.compute_valuation(&input).unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_shared_index_across_threads() {
    let e = Arc::new(engine());
    let expected = e
        .compute_valuation(&million_ebitda(
            ValueDriverGrades::uniform(Grade::A),
            Some("621210"),
        ))
        .unwrap()
        .result;

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let e = Arc::clone(&e);
                s.spawn(move || {
                    e.compute_valuation(&million_ebitda(
                        ValueDriverGrades::uniform(Grade::A),
                        Some("621210"),
                    ))
                    .unwrap()
                    .result
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

// ===========================================================================
// Intake contract
// ===========================================================================

fn persisted_form() -> serde_json::Value {
    serde_json::json!({
        "netIncome": "320,000",
        "interest": "18000",
        "taxes": "85000",
        "depreciation": "25000",
        "amortization": "2000",
        "ownerSalary": "120000",
        "personalExpenses": "9500",
        "oneTimeExpenses": "",
        "otherAdjustments": "(4,500)",
        "financialPerformance": "B",
        "growthPotential": "B",
        "recurringRevenue": "A",
        "customerConcentration": "C",
        "managementTeam": "B",
        "ownerDependence": "D",
        "competitivePosition": "B",
        "operationalSystems": "C",
        "marketConditions": "B",
        "customerSatisfaction": "A",
        "naicsCode": "238220"
    })
}

#[test]
fn test_form_end_to_end_record() {
    let form: ValuationForm = serde_json::from_value(persisted_form()).unwrap();
    let out = engine().compute_from_form(&form).unwrap();
    let record = out.result.to_record();

    assert_eq!(record.base_ebitda, dec!(450000));
    assert_eq!(record.adjusted_ebitda, dec!(575000));
    // 85+85+95+75+85+65+85+75+85+95 = 830
    assert_eq!(record.composite_score, dec!(83));
    assert_eq!(record.overall_score, Grade::B);
    // 238220 band 3.2 / 4.3 / 6.0: 4.3 + 1.7 * 0.7 = 5.49
    assert_eq!(record.valuation_multiple, dec!(5.49));
    assert_eq!(record.mid_estimate, dec!(575000) * dec!(5.49));
    assert_eq!(record.naics_code.as_deref(), Some("238220"));
}

#[test]
fn test_form_missing_grades_rejected() {
    let mut value = persisted_form();
    value.as_object_mut().unwrap().remove("ownerDependence");
    let form: ValuationForm = serde_json::from_value(value).unwrap();

    match engine().compute_from_form(&form).unwrap_err() {
        BizValError::Validation { field, .. } => assert_eq!(field, "ownerDependence"),
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[test]
fn test_form_letter_e_rejected() {
    let mut form: ValuationForm = serde_json::from_value(persisted_form()).unwrap();
    form.set_grade(ValueDriver::MarketConditions, "E");
    let err = engine().compute_from_form(&form).unwrap_err();
    assert!(matches!(err, BizValError::InvalidGrade { .. }));
    assert!(err.is_input_error());
}

#[test]
fn test_zero_ebitda_gives_zero_range() {
    let mut input = million_ebitda(ValueDriverGrades::uniform(Grade::B), None);
    input.financials = FinancialStatement::default();
    input.adjustments = OwnerAdjustments::default();
    let out = engine().compute_valuation(&input).unwrap();
    assert_eq!(out.result.mid, Decimal::ZERO);
    assert_eq!(out.result.low, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("Adjusted EBITDA")));
}

// ===========================================================================
// Amounts at the Decimal limits
// ===========================================================================

fn all_a_form(amounts: &[(&str, &str)]) -> ValuationForm {
    let mut form = ValuationForm::default();
    for driver in ValueDriver::ALL {
        form.set_grade(driver, "A");
    }
    let mut value = serde_json::to_value(&form).unwrap();
    for (field, amount) in amounts {
        value[*field] = serde_json::Value::String((*amount).to_string());
    }
    serde_json::from_value(value).unwrap()
}

fn assert_out_of_range(form: &ValuationForm) {
    let result = std::panic::catch_unwind(|| engine().compute_from_form(form));
    match result.expect("valuation must not panic") {
        Err(BizValError::Validation { reason, .. }) => assert_eq!(reason, "amount out of range"),
        other => panic!("expected out-of-range Validation error, got {other:?}"),
    }
}

#[test]
fn test_max_amount_plus_add_back_is_rejected() {
    let form = all_a_form(&[
        ("netIncome", "79228162514264337593543950335"),
        ("ownerSalary", "1"),
    ]);
    assert!(form.unparsed_amounts().is_empty());
    assert_out_of_range(&form);
}

#[test]
fn test_range_beyond_decimal_is_rejected() {
    let form = all_a_form(&[("netIncome", "70000000000000000000000000000")]);
    assert_out_of_range(&form);
}

#[test]
fn test_large_but_representable_amount_values() {
    let form = all_a_form(&[("netIncome", "1000000000000000000000000")]);
    let out = engine().compute_from_form(&form).unwrap();
    assert_eq!(out.result.adjusted_ebitda, dec!(1000000000000000000000000));
    assert_eq!(out.result.mid, out.result.adjusted_ebitda * out.result.multiplier);
}

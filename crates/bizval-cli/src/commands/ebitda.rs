use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use bizval_core::ebitda::{adjusted_ebitda, base_ebitda, FinancialStatement, OwnerAdjustments};
use bizval_core::types::{with_metadata, Money};
use bizval_core::ValuationForm;

use crate::input;

/// Arguments for EBITDA normalisation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EbitdaArgs {
    /// Path to a JSON or YAML assessment form; grades are not required
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub net_income: Option<String>,

    #[arg(long)]
    pub interest: Option<String>,

    #[arg(long)]
    pub taxes: Option<String>,

    #[arg(long)]
    pub depreciation: Option<String>,

    #[arg(long)]
    pub amortization: Option<String>,

    #[arg(long)]
    pub owner_salary: Option<String>,

    #[arg(long)]
    pub personal_expenses: Option<String>,

    #[arg(long)]
    pub one_time_expenses: Option<String>,

    #[arg(long)]
    pub other_adjustments: Option<String>,
}

#[derive(Serialize)]
struct EbitdaOutput {
    base_ebitda: Money,
    total_adjustments: Money,
    adjusted_ebitda: Money,
    financials: FinancialStatement,
    adjustments: OwnerAdjustments,
}

pub fn run_ebitda(args: EbitdaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();

    let form: ValuationForm = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(form) = input::stdin::read_stdin()? {
        form
    } else {
        ValuationForm {
            net_income: args.net_income,
            interest: args.interest,
            taxes: args.taxes,
            depreciation: args.depreciation,
            amortization: args.amortization,
            owner_salary: args.owner_salary,
            personal_expenses: args.personal_expenses,
            one_time_expenses: args.one_time_expenses,
            other_adjustments: args.other_adjustments,
            ..Default::default()
        }
    };

    let financials = form.financials();
    let adjustments = form.adjustments();

    let warnings: Vec<String> = form
        .unparsed_amounts()
        .into_iter()
        .map(|field| format!("{field} is not a number and was treated as 0"))
        .collect();

    let output = EbitdaOutput {
        base_ebitda: base_ebitda(&financials)?,
        total_adjustments: adjustments.total()?,
        adjusted_ebitda: adjusted_ebitda(&financials, &adjustments)?,
        financials,
        adjustments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "EBITDA Normalisation",
        &form,
        warnings,
        elapsed,
        output,
    ))?)
}

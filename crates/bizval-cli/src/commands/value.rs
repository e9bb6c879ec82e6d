use clap::Args;
use serde_json::Value;

use bizval_core::grading::ValueDriver;
use bizval_core::{ValuationEngine, ValuationForm};

use crate::input;

/// Arguments for a full valuation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValueArgs {
    /// Path to a JSON or YAML assessment form (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Ten value-driver grades (A, B, C, D or F) in order: financial performance,
    /// growth potential, recurring revenue, customer concentration, management team,
    /// owner dependence, competitive position, operational systems, market
    /// conditions, customer satisfaction
    #[arg(long, value_delimiter = ',')]
    pub grades: Vec<String>,

    /// Net income
    #[arg(long)]
    pub net_income: Option<String>,

    /// Interest expense
    #[arg(long)]
    pub interest: Option<String>,

    /// Income taxes
    #[arg(long)]
    pub taxes: Option<String>,

    /// Depreciation
    #[arg(long)]
    pub depreciation: Option<String>,

    /// Amortization
    #[arg(long)]
    pub amortization: Option<String>,

    /// Owner salary add-back
    #[arg(long)]
    pub owner_salary: Option<String>,

    /// Personal expenses run through the business
    #[arg(long)]
    pub personal_expenses: Option<String>,

    /// Non-recurring expenses
    #[arg(long)]
    pub one_time_expenses: Option<String>,

    /// Any other normalising adjustment (may be negative)
    #[arg(long)]
    pub other_adjustments: Option<String>,

    /// NAICS industry code (2 to 6 digits)
    #[arg(long)]
    pub naics: Option<String>,

    /// Emit only the persisted assessment record
    #[arg(long)]
    pub record: bool,
}

pub fn run_value(args: ValueArgs, table: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let form: ValuationForm = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(form) = input::stdin::read_stdin()? {
        form
    } else {
        form_from_flags(&args)?
    };

    let engine = ValuationEngine::new(super::load_index(table)?);
    let output = engine.compute_from_form(&form)?;

    if args.record {
        Ok(serde_json::to_value(output.result.to_record())?)
    } else {
        Ok(serde_json::to_value(output)?)
    }
}

fn form_from_flags(args: &ValueArgs) -> Result<ValuationForm, Box<dyn std::error::Error>> {
    if args.grades.len() > ValueDriver::ALL.len() {
        return Err(format!(
            "--grades takes {} grades, got {}",
            ValueDriver::ALL.len(),
            args.grades.len()
        )
        .into());
    }

    let mut form = ValuationForm {
        net_income: args.net_income.clone(),
        interest: args.interest.clone(),
        taxes: args.taxes.clone(),
        depreciation: args.depreciation.clone(),
        amortization: args.amortization.clone(),
        owner_salary: args.owner_salary.clone(),
        personal_expenses: args.personal_expenses.clone(),
        one_time_expenses: args.one_time_expenses.clone(),
        other_adjustments: args.other_adjustments.clone(),
        naics_code: args.naics.clone(),
        ..Default::default()
    };
    // Drivers without a grade stay empty and fail validation by name.
    for (driver, grade) in ValueDriver::ALL.into_iter().zip(&args.grades) {
        form.set_grade(driver, grade.as_str());
    }
    Ok(form)
}

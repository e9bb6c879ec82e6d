use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use bizval_core::grading::{
    composite_score, score_drivers, score_to_grade, Grade, GradeSummary, ValueDriver,
    ValueDriverGrades,
};
use bizval_core::types::{with_metadata, Score};

/// Arguments for value-driver scoring
#[derive(Args)]
pub struct ScoreArgs {
    /// Comma-separated letter grades (A, B, C, D, F)
    #[arg(long, value_delimiter = ',', required = true)]
    pub grades: Vec<String>,
}

#[derive(Serialize)]
struct ScoreOutput {
    composite_score: Score,
    overall_grade: Grade,
    grade_count: usize,
    /// Per-driver breakdown, only for a full set of ten grades
    #[serde(skip_serializing_if = "Option::is_none")]
    drivers: Option<GradeSummary>,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let grades = args
        .grades
        .iter()
        .map(|g| g.parse::<Grade>())
        .collect::<Result<Vec<Grade>, _>>()?;

    let composite = composite_score(&grades)?;
    let drivers = match <[Grade; 10]>::try_from(grades.as_slice()) {
        Ok(ten) => Some(score_drivers(&ValueDriverGrades::from_array(ten))?),
        Err(_) => {
            warnings.push(format!(
                "{} grades supplied; a valuation requires all {}",
                grades.len(),
                ValueDriver::ALL.len()
            ));
            None
        }
    };

    let output = ScoreOutput {
        composite_score: composite,
        overall_grade: score_to_grade(composite),
        grade_count: grades.len(),
        drivers,
    };

    let assumptions = serde_json::json!({
        "grade_scores": { "A": 95, "B": 85, "C": 75, "D": 65, "F": 50 },
        "weighting": "equal",
        "grade_floors": { "A": 90, "B": 80, "C": 70, "D": 60 },
    });
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Value Driver Composite Score",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))?)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::drivers::{ValueDriver, ValueDriverGrades};
use super::grade::{score_to_grade, Grade};
use crate::types::Score;
use crate::{BizValError, BizValResult};

/// One driver's contribution to the composite score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverScore {
    pub driver: ValueDriver,
    pub grade: Grade,
    pub score: u32,
}

/// Scored value drivers for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub composite_score: Score,
    pub overall_grade: Grade,
    pub drivers: Vec<DriverScore>,
    /// Drivers graded D or F, in persisted order.
    pub weakest_drivers: Vec<ValueDriver>,
}

/// Equal-weighted mean of the grades' tier midpoints.
pub fn composite_score(grades: &[Grade]) -> BizValResult<Score> {
    if grades.is_empty() {
        return Err(BizValError::InvalidGrade {
            field: "grades".into(),
            reason: "at least one grade is required".into(),
        });
    }
    let total: u32 = grades.iter().map(|g| g.score()).sum();
    Ok(Decimal::from(total) / Decimal::from(grades.len() as u64))
}

/// Score every driver and roll them up through [`composite_score`].
pub fn score_drivers(grades: &ValueDriverGrades) -> BizValResult<GradeSummary> {
    let composite = composite_score(&grades.to_array())?;
    let drivers: Vec<DriverScore> = grades
        .iter()
        .map(|(driver, grade)| DriverScore {
            driver,
            grade,
            score: grade.score(),
        })
        .collect();

    let weakest_drivers = drivers
        .iter()
        .filter(|d| d.grade.is_weak())
        .map(|d| d.driver)
        .collect();

    Ok(GradeSummary {
        composite_score: composite,
        overall_grade: score_to_grade(composite),
        drivers,
        weakest_drivers,
    })
}

//! Value-driver grading: ten A-F grades collapse into a composite score and
//! an overall letter.

pub mod drivers;
pub mod grade;
pub mod scorer;

pub use drivers::{ValueDriver, ValueDriverGrades};
pub use grade::{grade_to_score, score_to_grade, Grade};
pub use scorer::{composite_score, score_drivers, DriverScore, GradeSummary};

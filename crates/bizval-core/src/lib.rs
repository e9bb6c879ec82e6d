//! Business valuation engine.
//!
//! Turns an owner's financial statement, normalising adjustments and ten
//! graded value drivers into an adjusted EBITDA, an industry multiple
//! resolved through the NAICS hierarchy, and a low/mid/high value range.

pub mod ebitda;
pub mod engine;
pub mod error;
pub mod grading;
pub mod intake;
pub mod multiplier;
pub mod naics;
pub mod types;

pub use engine::{AssessmentRecord, ValuationEngine, ValuationResult};
pub use error::BizValError;
pub use intake::{ValuationForm, ValuationInput};
pub use types::*;

/// Standard result type for all valuation operations
pub type BizValResult<T> = Result<T, BizValError>;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::Score;
use crate::BizValError;

/// Letter grade for a single value driver. There is no `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

// Lower bound of each tier. Scores at or above the bound earn the grade.
const A_FLOOR: Score = dec!(90);
const B_FLOOR: Score = dec!(80);
const C_FLOOR: Score = dec!(70);
const D_FLOOR: Score = dec!(60);

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Midpoint score of the grade's tier.
    pub fn score(self) -> u32 {
        match self {
            Grade::A => 95,
            Grade::B => 85,
            Grade::C => 75,
            Grade::D => 65,
            Grade::F => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Grades that pull the valuation below the industry average.
    pub fn is_weak(self) -> bool {
        matches!(self, Grade::D | Grade::F)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = BizValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Grade::A),
            "B" | "b" => Ok(Grade::B),
            "C" | "c" => Ok(Grade::C),
            "D" | "d" => Ok(Grade::D),
            "F" | "f" => Ok(Grade::F),
            other => Err(BizValError::InvalidGrade {
                field: "grade".into(),
                reason: format!("'{other}' is not one of A, B, C, D, F"),
            }),
        }
    }
}

pub fn grade_to_score(grade: Grade) -> u32 {
    grade.score()
}

/// Map a 0-100 score to a letter using half-open tiers:
/// `>= 90` A, `>= 80` B, `>= 70` C, `>= 60` D, otherwise F.
pub fn score_to_grade(score: Score) -> Grade {
    if score >= A_FLOOR {
        Grade::A
    } else if score >= B_FLOOR {
        Grade::B
    } else if score >= C_FLOOR {
        Grade::C
    } else if score >= D_FLOOR {
        Grade::D
    } else {
        Grade::F
    }
}

impl From<Grade> for Decimal {
    fn from(g: Grade) -> Self {
        Decimal::from(g.score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_scores() {
        assert_eq!(grade_to_score(Grade::A), 95);
        assert_eq!(grade_to_score(Grade::B), 85);
        assert_eq!(grade_to_score(Grade::C), 75);
        assert_eq!(grade_to_score(Grade::D), 65);
        assert_eq!(grade_to_score(Grade::F), 50);
    }

    #[test]
    fn test_boundaries_half_open() {
        assert_eq!(score_to_grade(dec!(90.0)), Grade::A);
        assert_eq!(score_to_grade(dec!(89.999)), Grade::B);
        assert_eq!(score_to_grade(dec!(80)), Grade::B);
        assert_eq!(score_to_grade(dec!(79.99)), Grade::C);
        assert_eq!(score_to_grade(dec!(70)), Grade::C);
        assert_eq!(score_to_grade(dec!(60)), Grade::D);
        assert_eq!(score_to_grade(dec!(59.9)), Grade::F);
        assert_eq!(score_to_grade(Decimal::ZERO), Grade::F);
        assert_eq!(score_to_grade(dec!(100)), Grade::A);
    }

    #[test]
    fn test_midpoints_round_trip() {
        for g in Grade::ALL {
            assert_eq!(score_to_grade(Decimal::from(g)), g);
        }
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!("A".parse::<Grade>().unwrap(), Grade::A);
        assert_eq!(" f ".parse::<Grade>().unwrap(), Grade::F);
        assert_eq!("c".parse::<Grade>().unwrap(), Grade::C);
    }

    #[test]
    fn test_parse_rejects_e_and_garbage() {
        for bad in ["E", "e", "", "AB", "A+", "1"] {
            let err = bad.parse::<Grade>().unwrap_err();
            assert!(
                matches!(err, BizValError::InvalidGrade { .. }),
                "{bad:?} should be an invalid grade"
            );
        }
    }

    #[test]
    fn test_weak_grades() {
        assert!(Grade::D.is_weak());
        assert!(Grade::F.is_weak());
        assert!(!Grade::C.is_weak());
    }
}

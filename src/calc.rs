use crate::rows::AssignmentEntry;
use serde::Serialize;
use thiserror::Error;

pub const SCORE_MIN: i64 = 0;
pub const SCORE_MAX: i64 = 100;
pub const REQUIRED_TOTAL_WEIGHT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid whole number score (0-100).")]
    InvalidScore { index: usize },
    #[error("Please enter a valid whole number weight (>0).")]
    InvalidWeight { index: usize },
    #[error("Total weight for all assignments must equal 100%.")]
    WeightSumMismatch { total: i64 },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidScore { .. } => "invalid_score",
            ValidationError::InvalidWeight { .. } => "invalid_weight",
            ValidationError::WeightSumMismatch { .. } => "weight_sum_mismatch",
        }
    }

    pub fn details(&self) -> serde_json::Value {
        match self {
            ValidationError::InvalidScore { index } | ValidationError::InvalidWeight { index } => {
                serde_json::json!({ "index": index })
            }
            ValidationError::WeightSumMismatch { total } => serde_json::json!({ "totalWeight": total }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    U,
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::U => "U",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeClassification {
    pub letter: Letter,
    pub description: &'static str,
    pub style_tag: &'static str,
}

impl GradeClassification {
    /// Display line, e.g. `C – Good`.
    pub fn text(&self) -> String {
        format!("{} \u{2013} {}", self.letter, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub percentage: i64,
    pub raw_percentage: f64,
    pub weighted_sum: i64,
    pub total_weight: i64,
    pub classification: GradeClassification,
}

// Highest threshold first; inclusive lower bounds.
const GRADE_SCALE: [(i64, Letter, &str, &str); 6] = [
    (90, Letter::A, "Excellent", "grade-A"),
    (80, Letter::B, "Very Good", "grade-B"),
    (70, Letter::C, "Good", "grade-C"),
    (60, Letter::D, "Satisfactory", "grade-D"),
    (50, Letter::E, "Pass", "grade-E"),
    (40, Letter::F, "Fail", "grade-F"),
];

pub fn classify(percentage: i64) -> GradeClassification {
    for (min, letter, description, style_tag) in GRADE_SCALE {
        if percentage >= min {
            return GradeClassification {
                letter,
                description,
                style_tag,
            };
        }
    }
    GradeClassification {
        letter: Letter::U,
        description: "Ungraded (Not Achieved)",
        style_tag: "grade-U",
    }
}

/// Input filter applied to score/weight fields as they are typed: every
/// non-digit character is dropped.
pub fn sanitize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strict whole-number parse. Blank, fractional or otherwise non-numeric text
/// yields `None`; signs are accepted so that range checks can reject them.
/// Integers too long for `i64` clamp to `i64::MAX` / `i64::MIN`.
pub fn parse_whole_number(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Validates the rows in order and computes the weighted percentage.
///
/// Each row is checked score-then-weight and the first failure wins. The
/// percentage is the weighted average rounded up to the next whole number.
pub fn evaluate(entries: &[AssignmentEntry]) -> Result<GradeReport, ValidationError> {
    let mut weighted_sum: i64 = 0;
    let mut total_weight: i64 = 0;

    for (index, entry) in entries.iter().enumerate() {
        let score = match parse_whole_number(entry.score.as_deref()) {
            Some(v) if (SCORE_MIN..=SCORE_MAX).contains(&v) => v,
            _ => return Err(ValidationError::InvalidScore { index }),
        };
        let weight = match parse_whole_number(entry.weight.as_deref()) {
            Some(v) if v > 0 => v,
            _ => return Err(ValidationError::InvalidWeight { index }),
        };
        weighted_sum = weighted_sum.saturating_add(score.saturating_mul(weight));
        total_weight = total_weight.saturating_add(weight);
    }

    if total_weight != REQUIRED_TOTAL_WEIGHT {
        return Err(ValidationError::WeightSumMismatch {
            total: total_weight,
        });
    }

    let raw_percentage = weighted_sum as f64 / total_weight as f64;
    // Integer ceiling; both operands are non-negative here.
    let percentage = (weighted_sum + total_weight - 1) / total_weight;

    Ok(GradeReport {
        percentage,
        raw_percentage,
        weighted_sum,
        total_weight,
        classification: classify(percentage),
    })
}

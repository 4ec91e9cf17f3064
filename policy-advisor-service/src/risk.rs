//! The two risk heuristics.
//!
//! `assess_risk_label` feeds the policy recommendation and returns a coarse
//! tier. `premium_risk_score` feeds the premium estimator and returns a
//! 0..=100 score. They use different scales and different driving-record
//! vocabularies and must stay separate: the premium numbers depend on the
//! second formula exactly as it is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::PremiumDrivingRecord;

/// Cap applied to the premium risk score
pub const MAX_PREMIUM_RISK_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLabel {
    pub fn from_points(points: u32) -> Self {
        match points {
            0..=3 => RiskLabel::Low,
            4..=6 => RiskLabel::Medium,
            _ => RiskLabel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk",
            RiskLabel::Medium => "Medium Risk",
            RiskLabel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive points behind [`assess_risk_label`]
pub fn risk_points(age: u32, income: f64, driving_record: &str, smoker: bool) -> u32 {
    let age_points = if age < 25 {
        2
    } else if age > 60 {
        3
    } else {
        1
    };

    let income_points = if income < 30_000.0 {
        2
    } else if income < 60_000.0 {
        1
    } else {
        0
    };

    let driving_points = match driving_record {
        "DUI" => 3,
        "Accident" => 2,
        "Major Violations" => 4,
        _ => 0,
    };

    let smoker_points = if smoker { 3 } else { 0 };

    age_points + income_points + driving_points + smoker_points
}

/// Tiered risk label for the recommendation flow
pub fn assess_risk_label(age: u32, income: f64, driving_record: &str, smoker: bool) -> RiskLabel {
    RiskLabel::from_points(risk_points(age, income, driving_record, smoker))
}

/// 0..=100 risk score for the premium estimator
pub fn premium_risk_score(
    age: u32,
    income: f64,
    smoker: bool,
    driving_record: PremiumDrivingRecord,
) -> u32 {
    let mut score = 30;

    if age >= 50 {
        score += 20;
    } else if age >= 35 {
        score += 10;
    }

    if income < 300_000.0 {
        score += 10;
    }

    if smoker {
        score += 25;
    }

    score += match driving_record {
        PremiumDrivingRecord::MajorViolations => 15,
        PremiumDrivingRecord::MinorOffenses => 5,
        PremiumDrivingRecord::Clean => 0,
    };

    score.min(MAX_PREMIUM_RISK_SCORE)
}

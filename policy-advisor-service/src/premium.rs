use serde::{Deserialize, Serialize};

use crate::models::{PolicyType, PremiumRequest};
use crate::risk::premium_risk_score;

/// Annual premium before plan surcharge and risk loading, in rupees
pub const BASE_ANNUAL_PREMIUM: f64 = 8000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumEstimate {
    pub risk_score: u32,
    pub annual_base: f64,
    pub multiplier: f64,
    pub estimated_annual: f64,
    pub estimated_monthly: f64,
}

impl PremiumEstimate {
    /// Monthly premium as shown to the user, e.g. `₹1120.00`
    pub fn monthly_display(&self) -> String {
        format!("₹{:.2}", self.estimated_monthly)
    }
}

/// Flat yearly surcharge per plan kind
pub fn plan_surcharge(plan_type: PolicyType) -> f64 {
    match plan_type {
        PolicyType::TermLife | PolicyType::GroupLife => 2000.0,
        PolicyType::CriticalIllness => 4000.0,
        PolicyType::FamilyFloater => 5000.0,
        PolicyType::Health | PolicyType::GroupHealth | PolicyType::PersonalAccident => 0.0,
    }
}

pub fn estimate_premium(request: &PremiumRequest) -> PremiumEstimate {
    let risk_score = premium_risk_score(
        request.age,
        request.income,
        request.smoker,
        request.driving_record,
    );
    let annual_base = BASE_ANNUAL_PREMIUM + plan_surcharge(request.plan_type);
    let multiplier = 1.0 + f64::from(risk_score) / 100.0;
    let estimated_annual = annual_base * multiplier;

    PremiumEstimate {
        risk_score,
        annual_base,
        multiplier,
        estimated_annual,
        estimated_monthly: estimated_annual / 12.0,
    }
}

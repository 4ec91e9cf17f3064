use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::risk::{RiskLabel, assess_risk_label};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 80;
pub const MIN_FAMILY_MEMBERS: usize = 1;
pub const MAX_FAMILY_MEMBERS: usize = 10;

/// The plan kinds a user can ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    #[serde(rename = "Term Life Insurance")]
    TermLife,
    #[serde(rename = "Health Insurance")]
    Health,
    #[serde(rename = "Family Floater Plan")]
    FamilyFloater,
    #[serde(rename = "Critical Illness Cover")]
    CriticalIllness,
    #[serde(rename = "Group Health Insurance")]
    GroupHealth,
    #[serde(rename = "Group Life Insurance")]
    GroupLife,
    #[serde(rename = "Personal Accident Insurance")]
    PersonalAccident,
}

impl PolicyType {
    pub const ALL: [PolicyType; 7] = [
        PolicyType::TermLife,
        PolicyType::Health,
        PolicyType::FamilyFloater,
        PolicyType::CriticalIllness,
        PolicyType::GroupHealth,
        PolicyType::GroupLife,
        PolicyType::PersonalAccident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::TermLife => "Term Life Insurance",
            PolicyType::Health => "Health Insurance",
            PolicyType::FamilyFloater => "Family Floater Plan",
            PolicyType::CriticalIllness => "Critical Illness Cover",
            PolicyType::GroupHealth => "Group Health Insurance",
            PolicyType::GroupLife => "Group Life Insurance",
            PolicyType::PersonalAccident => "Personal Accident Insurance",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PreExistingCondition {
    #[default]
    None,
    Diabetes,
    Hypertension,
    Asthma,
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    Cancer,
    Thyroid,
    Obesity,
    Other,
}

impl PreExistingCondition {
    pub const ALL: [PreExistingCondition; 9] = [
        PreExistingCondition::None,
        PreExistingCondition::Diabetes,
        PreExistingCondition::Hypertension,
        PreExistingCondition::Asthma,
        PreExistingCondition::HeartDisease,
        PreExistingCondition::Cancer,
        PreExistingCondition::Thyroid,
        PreExistingCondition::Obesity,
        PreExistingCondition::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreExistingCondition::None => "None",
            PreExistingCondition::Diabetes => "Diabetes",
            PreExistingCondition::Hypertension => "Hypertension",
            PreExistingCondition::Asthma => "Asthma",
            PreExistingCondition::HeartDisease => "Heart Disease",
            PreExistingCondition::Cancer => "Cancer",
            PreExistingCondition::Thyroid => "Thyroid",
            PreExistingCondition::Obesity => "Obesity",
            PreExistingCondition::Other => "Other",
        }
    }
}

impl fmt::Display for PreExistingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driving record vocabulary of the premium estimator. The recommendation
/// flow takes free categories from the reference dataset instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PremiumDrivingRecord {
    #[default]
    Clean,
    #[serde(rename = "Minor Offenses")]
    MinorOffenses,
    #[serde(rename = "Major Violations")]
    MajorViolations,
}

impl PremiumDrivingRecord {
    pub const ALL: [PremiumDrivingRecord; 3] = [
        PremiumDrivingRecord::Clean,
        PremiumDrivingRecord::MinorOffenses,
        PremiumDrivingRecord::MajorViolations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PremiumDrivingRecord::Clean => "Clean",
            PremiumDrivingRecord::MinorOffenses => "Minor Offenses",
            PremiumDrivingRecord::MajorViolations => "Major Violations",
        }
    }
}

impl fmt::Display for PremiumDrivingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("age must be between 18 and 80, got {0}")]
    AgeOutOfRange(u32),

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("family_members is required for a Family Floater Plan")]
    MissingFamilyMembers,

    #[error("family_members must be between 1 and 10, got {0}")]
    FamilyMembersOutOfRange(usize),

    #[error("expected one pre-existing condition per family member ({expected}), got {actual}")]
    FamilyConditionCountMismatch { expected: usize, actual: usize },

    #[error("family fields are only accepted for a Family Floater Plan, not {0}")]
    FamilyFieldsOnIndividualPlan(PolicyType),

    #[error("a Family Floater Plan takes family_member_conditions, not pre_existing_condition")]
    IndividualConditionOnFamilyPlan,
}

/// Raw policy-recommendation form submission, as posted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub age: u32,
    pub gender: String,
    pub marital_status: String,
    pub occupation: String,
    pub income: f64,
    pub education: String,
    pub location: String,
    pub policy_type: PolicyType,
    pub smoker: bool,
    pub driving_record: String,
    /// Applicant's own condition, used for every plan except the family floater
    #[serde(default)]
    pub pre_existing_condition: Option<PreExistingCondition>,
    #[serde(default)]
    pub family_members: Option<usize>,
    /// One entry per covered member; defaults to `None` for each member when omitted
    #[serde(default)]
    pub family_member_conditions: Option<Vec<PreExistingCondition>>,
}

/// Who the plan covers and their declared conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    Individual {
        condition: PreExistingCondition,
    },
    FamilyFloater {
        member_conditions: Vec<PreExistingCondition>,
    },
}

/// Validated applicant attributes for one recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub age: u32,
    pub gender: String,
    pub marital_status: String,
    pub occupation: String,
    pub income: f64,
    pub education: String,
    pub location: String,
    pub policy_type: PolicyType,
    pub smoker: bool,
    pub driving_record: String,
    pub risk_label: RiskLabel,
    pub coverage: Coverage,
}

impl ApplicantProfile {
    /// Validate a submission and derive its risk label
    pub fn from_submission(submission: ApplicantSubmission) -> Result<Self, ProfileError> {
        validate_age(submission.age)?;
        validate_amount("income", submission.income)?;

        let gender = required("gender", submission.gender)?;
        let marital_status = required("marital_status", submission.marital_status)?;
        let occupation = required("occupation", submission.occupation)?;
        let education = required("education", submission.education)?;
        let location = required("location", submission.location)?;
        let driving_record = required("driving_record", submission.driving_record)?;

        let coverage = match submission.policy_type {
            PolicyType::FamilyFloater => {
                if submission.pre_existing_condition.is_some() {
                    return Err(ProfileError::IndividualConditionOnFamilyPlan);
                }
                let members = submission
                    .family_members
                    .ok_or(ProfileError::MissingFamilyMembers)?;
                if !(MIN_FAMILY_MEMBERS..=MAX_FAMILY_MEMBERS).contains(&members) {
                    return Err(ProfileError::FamilyMembersOutOfRange(members));
                }
                let member_conditions = match submission.family_member_conditions {
                    Some(conditions) if conditions.len() != members => {
                        return Err(ProfileError::FamilyConditionCountMismatch {
                            expected: members,
                            actual: conditions.len(),
                        });
                    }
                    Some(conditions) => conditions,
                    None => vec![PreExistingCondition::None; members],
                };
                Coverage::FamilyFloater { member_conditions }
            }
            other => {
                if submission.family_members.is_some()
                    || submission.family_member_conditions.is_some()
                {
                    return Err(ProfileError::FamilyFieldsOnIndividualPlan(other));
                }
                Coverage::Individual {
                    condition: submission.pre_existing_condition.unwrap_or_default(),
                }
            }
        };

        let risk_label = assess_risk_label(
            submission.age,
            submission.income,
            &driving_record,
            submission.smoker,
        );

        Ok(Self {
            age: submission.age,
            gender,
            marital_status,
            occupation,
            income: submission.income,
            education,
            location,
            policy_type: submission.policy_type,
            smoker: submission.smoker,
            driving_record,
            risk_label,
            coverage,
        })
    }

    pub fn family_members(&self) -> Option<usize> {
        match &self.coverage {
            Coverage::FamilyFloater { member_conditions } => Some(member_conditions.len()),
            Coverage::Individual { .. } => None,
        }
    }

    /// Every attribute as a labelled pair, in the order the form collects them
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let family_members = self
            .family_members()
            .map_or_else(|| "N/A".to_string(), |n| n.to_string());
        let conditions = match &self.coverage {
            Coverage::Individual { condition } => condition.to_string(),
            Coverage::FamilyFloater { member_conditions } => {
                let listed = member_conditions
                    .iter()
                    .map(PreExistingCondition::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{listed}]")
            }
        };

        vec![
            ("Age", self.age.to_string()),
            ("Gender", self.gender.clone()),
            ("Marital Status", self.marital_status.clone()),
            ("Occupation", self.occupation.clone()),
            ("Income Level", self.income.to_string()),
            ("Education Level", self.education.clone()),
            ("Geographic Information", self.location.clone()),
            ("Preferred Policy Type", self.policy_type.to_string()),
            ("Smoker", yes_no(self.smoker).to_string()),
            ("Driving Record", self.driving_record.clone()),
            ("Risk Score", self.risk_label.to_string()),
            ("Family Members", family_members),
            ("Pre-existing Condition", conditions),
        ]
    }
}

/// Premium calculator form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumRequest {
    pub plan_type: PolicyType,
    pub age: u32,
    pub income: f64,
    /// Desired sum insured, only used to brief the explanation
    pub coverage: f64,
    pub smoker: bool,
    pub driving_record: PremiumDrivingRecord,
}

impl PremiumRequest {
    pub fn validate(&self) -> Result<(), ProfileError> {
        validate_age(self.age)?;
        validate_amount("income", self.income)?;
        validate_amount("coverage", self.coverage)?;
        Ok(())
    }
}

/// One organic web search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// User-visible message explaining why a flow stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn validate_age(age: u32) -> Result<(), ProfileError> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(())
    } else {
        Err(ProfileError::AgeOutOfRange(age))
    }
}

fn validate_amount(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidAmount { field, value })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ProfileError::BlankField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

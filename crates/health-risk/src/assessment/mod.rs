//! Rule-based health risk assessment.
//!
//! The pipeline is linear and pure: validate the submitted profile, score it
//! into four domain scores plus an overall score, derive recommendations and
//! key factors from those scores, then assemble the response record. Nothing
//! here touches I/O or shared state, so calls may run concurrently.

pub mod factors;
pub mod profile;
pub mod recommendations;
pub mod scoring;
pub mod validation;

#[cfg(test)]
mod tests;

pub use factors::{rank_key_factors, Impact, KeyFactor, MAX_KEY_FACTORS};
pub use profile::{ActivityLevel, Gender, HealthProfile, ProfileField, SmokingStatus};
pub use recommendations::{generate_recommendations, MAX_RECOMMENDATIONS};
pub use scoring::{score_profile, DomainScores, FactorRisks, RiskLevel, RiskScores};
pub use validation::{validate_candidate, ValidationError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// Response record for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    pub cardiovascular_risk: u8,
    pub respiratory_risk: u8,
    pub metabolic_risk: u8,
    pub environmental_risk: u8,
    pub recommendations: Vec<String>,
    pub key_factors: Vec<KeyFactor>,
}

impl RiskAssessment {
    pub fn scores(&self) -> RiskScores {
        RiskScores {
            overall: self.overall_score,
            risk_level: self.risk_level,
            cardiovascular: self.cardiovascular_risk,
            respiratory: self.respiratory_risk,
            metabolic: self.metabolic_risk,
            environmental: self.environmental_risk,
        }
    }
}

/// Error raised by the assessment pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("risk scoring fault: {0}")]
    Internal(String),
}

impl AssessmentError {
    pub const fn code(&self) -> &'static str {
        match self {
            AssessmentError::Validation(_) => "VALIDATION_ERROR",
            AssessmentError::Internal(_) => "ASSESSMENT_ERROR",
        }
    }
}

/// Assess an untyped JSON record as received from a client.
pub fn assess(candidate: &Value) -> Result<RiskAssessment, AssessmentError> {
    let profile = validate_candidate(candidate)?;
    assemble(&profile)
}

/// Assess a profile built by a Rust caller; only the range checks apply.
pub fn assess_profile(profile: &HealthProfile) -> Result<RiskAssessment, AssessmentError> {
    profile.validate()?;
    assemble(profile)
}

fn assemble(profile: &HealthProfile) -> Result<RiskAssessment, AssessmentError> {
    let (_, domains, scores) = score_profile(profile);
    if !domains.is_finite() {
        error!(?domains, "domain scores are not finite");
        return Err(AssessmentError::Internal(
            "domain scores are not finite".to_string(),
        ));
    }

    let recommendations = generate_recommendations(profile, &scores);
    let key_factors = rank_key_factors(profile, &scores);

    Ok(RiskAssessment {
        overall_score: scores.overall,
        risk_level: scores.risk_level,
        cardiovascular_risk: scores.cardiovascular,
        respiratory_risk: scores.respiratory,
        metabolic_risk: scores.metabolic,
        environmental_risk: scores.environmental,
        recommendations,
        key_factors,
    })
}

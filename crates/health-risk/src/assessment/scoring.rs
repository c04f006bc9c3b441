use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profile::{ActivityLevel, HealthProfile, SmokingStatus};

/// Per-factor sub-scores feeding the domain formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorRisks {
    pub age: f64,
    pub bmi: f64,
    pub blood_pressure: f64,
    pub cholesterol: f64,
    pub glucose: f64,
    pub smoking: f64,
    pub activity: f64,
    pub aqi: f64,
    pub heat: f64,
}

/// Unrounded domain scores, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainScores {
    pub cardiovascular: f64,
    pub respiratory: f64,
    pub metabolic: f64,
    pub environmental: f64,
    pub overall: f64,
}

/// Scores as presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub overall: u8,
    pub risk_level: RiskLevel,
    pub cardiovascular: u8,
    pub respiratory: u8,
    pub metabolic: u8,
    pub environmental: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const fn from_score(overall: u8) -> Self {
        match overall {
            0..=19 => Self::Low,
            20..=39 => Self::Moderate,
            40..=69 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl FactorRisks {
    pub fn from_profile(profile: &HealthProfile) -> Self {
        // Floored so a young profile never subtracts from a domain.
        let age = ((profile.age - 20.0) * 1.5).clamp(0.0, 100.0);

        let bmi = if profile.bmi < 18.5 {
            30.0
        } else if profile.bmi < 25.0 {
            10.0
        } else if profile.bmi < 30.0 {
            40.0
        } else {
            70.0
        };

        let mean_arterial = (profile.systolic_bp + profile.diastolic_bp * 2.0) / 3.0;
        let blood_pressure = if mean_arterial < 120.0 {
            10.0
        } else if mean_arterial < 140.0 {
            30.0
        } else if mean_arterial < 160.0 {
            60.0
        } else {
            85.0
        };

        let cholesterol = if profile.cholesterol < 200.0 {
            15.0
        } else if profile.cholesterol < 240.0 {
            35.0
        } else {
            65.0
        };

        let glucose = if profile.glucose < 100.0 {
            10.0
        } else if profile.glucose < 126.0 {
            40.0
        } else {
            75.0
        };

        let smoking = match profile.smoking {
            SmokingStatus::Current => 80.0,
            SmokingStatus::Former => 30.0,
            SmokingStatus::Never | SmokingStatus::Other => 5.0,
        };

        let activity = match profile.physical_activity {
            ActivityLevel::High => 10.0,
            ActivityLevel::Moderate => 30.0,
            ActivityLevel::Low | ActivityLevel::Other => 60.0,
        };

        let aqi = (profile.aqi_exposure / 500.0 * 100.0).min(100.0);
        let heat = (profile.heat_exposure / 100.0 * 100.0).min(100.0);

        Self {
            age,
            bmi,
            blood_pressure,
            cholesterol,
            glucose,
            smoking,
            activity,
            aqi,
            heat,
        }
    }
}

impl DomainScores {
    pub fn combine(factors: &FactorRisks) -> Self {
        let cardiovascular = weighted(&[
            (factors.age, 0.30),
            (factors.blood_pressure, 0.35),
            (factors.cholesterol, 0.25),
            (factors.smoking, 0.10),
        ]);
        let respiratory = weighted(&[
            (factors.smoking, 0.40),
            (factors.aqi, 0.35),
            (factors.age, 0.15),
            (factors.activity, 0.10),
        ]);
        let metabolic = weighted(&[
            (factors.bmi, 0.35),
            (factors.glucose, 0.35),
            (factors.age, 0.20),
            (factors.activity, 0.10),
        ]);
        let environmental = weighted(&[(factors.aqi, 0.60), (factors.heat, 0.40)]);
        let overall = weighted(&[
            (cardiovascular, 0.30),
            (respiratory, 0.25),
            (metabolic, 0.25),
            (environmental, 0.20),
        ]);

        Self {
            cardiovascular,
            respiratory,
            metabolic,
            environmental,
            overall,
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.cardiovascular,
            self.respiratory,
            self.metabolic,
            self.environmental,
            self.overall,
        ]
        .iter()
        .all(|score| score.is_finite())
    }

    /// Round once, at the end, and classify the tier from the rounded overall.
    pub fn present(&self) -> RiskScores {
        let overall = present_score(self.overall);
        let risk_level = RiskLevel::from_score(overall);
        debug!(overall, level = risk_level.label(), "classified risk tier");

        RiskScores {
            overall,
            risk_level,
            cardiovascular: present_score(self.cardiovascular),
            respiratory: present_score(self.respiratory),
            metabolic: present_score(self.metabolic),
            environmental: present_score(self.environmental),
        }
    }
}

pub fn score_profile(profile: &HealthProfile) -> (FactorRisks, DomainScores, RiskScores) {
    let factors = FactorRisks::from_profile(profile);
    let domains = DomainScores::combine(&factors);
    let scores = domains.present();
    (factors, domains, scores)
}

fn weighted(terms: &[(f64, f64)]) -> f64 {
    terms
        .iter()
        .map(|(risk, weight)| risk * weight)
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

fn present_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

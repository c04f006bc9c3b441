use serde::{Deserialize, Serialize};

use super::profile::{ActivityLevel, HealthProfile};
use super::scoring::RiskScores;

pub const MAX_KEY_FACTORS: usize = 4;

const FACTOR_SCORE_THRESHOLD: u8 = 40;
const HEAT_STRESS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Positive,
    Negative,
}

/// Labeled explanation rendered as a bar in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFactor {
    pub factor: String,
    pub impact: Impact,
    pub value: u8,
}

impl KeyFactor {
    fn negative(factor: &str, value: u8) -> Self {
        Self {
            factor: factor.to_string(),
            impact: Impact::Negative,
            value,
        }
    }

    fn ranked(self) -> (f64, KeyFactor) {
        (f64::from(self.value), self)
    }
}

/// Factors sorted by descending magnitude; ties keep construction order.
///
/// Heat stress ranks on the raw exposure and is rounded only when emitted, so
/// 55.4 still outranks a presented score of 55.
pub fn rank_key_factors(profile: &HealthProfile, scores: &RiskScores) -> Vec<KeyFactor> {
    let mut ranked: Vec<(f64, KeyFactor)> = Vec::with_capacity(MAX_KEY_FACTORS);

    if scores.environmental > FACTOR_SCORE_THRESHOLD {
        ranked.push(KeyFactor::negative("Air Quality Impact", scores.environmental).ranked());
    }

    if profile.heat_exposure > HEAT_STRESS_THRESHOLD {
        let heat = profile.heat_exposure.clamp(0.0, 100.0).round() as u8;
        ranked.push((
            profile.heat_exposure,
            KeyFactor::negative("Heat Stress", heat),
        ));
    }

    if scores.cardiovascular > FACTOR_SCORE_THRESHOLD {
        ranked.push(KeyFactor::negative("Cardiovascular Risk", scores.cardiovascular).ranked());
    }

    let activity = match profile.physical_activity {
        ActivityLevel::High => KeyFactor {
            factor: "Physical Activity".to_string(),
            impact: Impact::Positive,
            value: 85,
        },
        ActivityLevel::Moderate => KeyFactor::negative("Physical Activity", 40),
        ActivityLevel::Low | ActivityLevel::Other => KeyFactor::negative("Physical Activity", 70),
    };
    ranked.push(activity.ranked());

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
        .into_iter()
        .take(MAX_KEY_FACTORS)
        .map(|(_, factor)| factor)
        .collect()
}

use super::profile::{ActivityLevel, HealthProfile, SmokingStatus};
use super::scoring::RiskScores;

pub const MAX_RECOMMENDATIONS: usize = 6;

/// Domain score at which that domain's advice becomes eligible.
const DOMAIN_ALERT_THRESHOLD: u8 = 50;
const COMPREHENSIVE_CHECKUP_THRESHOLD: u8 = 40;

pub(crate) const CARDIO_CHECKUP: &str = "Schedule a cardiovascular checkup with your doctor soon.";
pub(crate) const BLOOD_PRESSURE: &str =
    "Monitor your blood pressure daily and consider reducing sodium intake.";
pub(crate) const CHOLESTEROL_DIET: &str =
    "Adopt a heart-healthy diet low in saturated fats and high in fiber.";
pub(crate) const QUIT_SMOKING: &str =
    "Consider quitting smoking - it's the most effective way to improve respiratory health.";
pub(crate) const AIR_QUALITY: &str =
    "Limit outdoor activities on high AQI days and consider using an air purifier indoors.";
pub(crate) const WEIGHT_MANAGEMENT: &str =
    "Focus on gradual weight loss through balanced diet and regular exercise.";
pub(crate) const GLUCOSE_MONITORING: &str =
    "Monitor blood glucose levels regularly and reduce refined carbohydrate intake.";
pub(crate) const EXERCISE_VOLUME: &str =
    "Aim for at least 150 minutes of moderate-intensity exercise per week.";
pub(crate) const HEAT_PRECAUTIONS: &str =
    "Stay hydrated and avoid prolonged sun exposure during peak hours.";
pub(crate) const MASK_OUTDOORS: &str = "Wear a mask when outdoors during poor air quality days.";
pub(crate) const COMPREHENSIVE_CHECKUP: &str =
    "Schedule a comprehensive health checkup within the next month.";
pub(crate) const AGE_SCREENING: &str =
    "Consider regular health screenings appropriate for your age group.";

pub(crate) const MAINTENANCE_ADVICE: [&str; 3] = [
    "Maintain your current healthy lifestyle with regular exercise and balanced nutrition.",
    "Continue monitoring your health metrics periodically.",
    "Stay updated with preventive health screenings.",
];

/// Advice in fixed priority order, capped at [`MAX_RECOMMENDATIONS`].
///
/// Each rule fires at most once, so the list never holds duplicates. When no
/// rule fires the three maintenance tips are returned instead.
pub fn generate_recommendations(profile: &HealthProfile, scores: &RiskScores) -> Vec<String> {
    let mut advice: Vec<&'static str> = Vec::new();

    if scores.cardiovascular >= DOMAIN_ALERT_THRESHOLD {
        advice.push(CARDIO_CHECKUP);
        if profile.systolic_bp > 140.0 || profile.diastolic_bp > 90.0 {
            advice.push(BLOOD_PRESSURE);
        }
        if profile.cholesterol > 240.0 {
            advice.push(CHOLESTEROL_DIET);
        }
    }

    if scores.respiratory >= DOMAIN_ALERT_THRESHOLD {
        if profile.smoking == SmokingStatus::Current {
            advice.push(QUIT_SMOKING);
        }
        if profile.aqi_exposure > 150.0 {
            advice.push(AIR_QUALITY);
        }
    }

    if scores.metabolic >= DOMAIN_ALERT_THRESHOLD {
        if profile.bmi > 30.0 {
            advice.push(WEIGHT_MANAGEMENT);
        }
        if profile.glucose > 126.0 {
            advice.push(GLUCOSE_MONITORING);
        }
        if profile.physical_activity == ActivityLevel::Low {
            advice.push(EXERCISE_VOLUME);
        }
    }

    if scores.environmental >= DOMAIN_ALERT_THRESHOLD {
        if profile.heat_exposure > 60.0 {
            advice.push(HEAT_PRECAUTIONS);
        }
        if profile.aqi_exposure > 100.0 {
            advice.push(MASK_OUTDOORS);
        }
    }

    if scores.overall >= COMPREHENSIVE_CHECKUP_THRESHOLD {
        advice.push(COMPREHENSIVE_CHECKUP);
    }
    if profile.age > 50.0 {
        advice.push(AGE_SCREENING);
    }

    if advice.is_empty() {
        advice.extend(MAINTENANCE_ADVICE);
    }

    advice
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}

use serde_json::{json, Value};

use crate::assessment::{ActivityLevel, Gender, HealthProfile, RiskLevel, RiskScores, SmokingStatus};

/// Healthy 30-year-old used as the dashboard's default form values.
pub(super) fn baseline_profile() -> HealthProfile {
    HealthProfile {
        age: 30.0,
        gender: Gender::Male,
        bmi: 22.5,
        systolic_bp: 120.0,
        diastolic_bp: 80.0,
        cholesterol: 180.0,
        glucose: 90.0,
        smoking: SmokingStatus::Never,
        physical_activity: ActivityLevel::Moderate,
        aqi_exposure: 50.0,
        heat_exposure: 25.0,
    }
}

pub(super) fn baseline_json() -> Value {
    json!({
        "age": 30,
        "gender": "male",
        "bmi": 22.5,
        "systolic_bp": 120,
        "diastolic_bp": 80,
        "cholesterol": 180,
        "glucose": 90,
        "smoking": "never",
        "physical_activity": "moderate",
        "aqi_exposure": 50,
        "heat_exposure": 25
    })
}

/// Older smoker with metabolic and environmental load across every domain.
pub(super) fn high_risk_profile() -> HealthProfile {
    HealthProfile {
        age: 65.0,
        gender: Gender::Female,
        bmi: 32.0,
        systolic_bp: 165.0,
        diastolic_bp: 100.0,
        cholesterol: 260.0,
        glucose: 140.0,
        smoking: SmokingStatus::Current,
        physical_activity: ActivityLevel::Low,
        aqi_exposure: 200.0,
        heat_exposure: 70.0,
    }
}

/// Every input pinned at its worst permitted value.
pub(super) fn worst_case_profile() -> HealthProfile {
    HealthProfile {
        age: 120.0,
        gender: Gender::Other,
        bmi: 45.0,
        systolic_bp: 250.0,
        diastolic_bp: 150.0,
        cholesterol: 400.0,
        glucose: 400.0,
        smoking: SmokingStatus::Current,
        physical_activity: ActivityLevel::Low,
        aqi_exposure: 500.0,
        heat_exposure: 100.0,
    }
}

pub(super) fn with_field(mut candidate: Value, field: &str, value: Value) -> Value {
    candidate
        .as_object_mut()
        .expect("candidate is an object")
        .insert(field.to_string(), value);
    candidate
}

pub(super) fn without_field(mut candidate: Value, field: &str) -> Value {
    candidate
        .as_object_mut()
        .expect("candidate is an object")
        .remove(field);
    candidate
}

pub(super) fn expected_scores(
    overall: u8,
    cardiovascular: u8,
    respiratory: u8,
    metabolic: u8,
    environmental: u8,
) -> RiskScores {
    RiskScores {
        overall,
        risk_level: RiskLevel::from_score(overall),
        cardiovascular,
        respiratory,
        metabolic,
        environmental,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

use serde_json::{Map, Value};
use tracing::warn;

use super::profile::{ActivityLevel, Gender, HealthProfile, ProfileField, SmokingStatus};

/// Rejection raised for the first offending input field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(ProfileField),
    #[error("{label} must be between {min} and {max}{unit}")]
    OutOfRange {
        field: ProfileField,
        label: &'static str,
        min: f64,
        max: f64,
        unit: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> ProfileField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

struct RangeRule {
    field: ProfileField,
    label: &'static str,
    min: f64,
    max: f64,
    unit: &'static str,
}

const RANGE_RULES: [RangeRule; 8] = [
    RangeRule {
        field: ProfileField::Age,
        label: "Age",
        min: 1.0,
        max: 120.0,
        unit: "",
    },
    RangeRule {
        field: ProfileField::Bmi,
        label: "BMI",
        min: 10.0,
        max: 50.0,
        unit: "",
    },
    RangeRule {
        field: ProfileField::SystolicBp,
        label: "Systolic BP",
        min: 60.0,
        max: 250.0,
        unit: "",
    },
    RangeRule {
        field: ProfileField::DiastolicBp,
        label: "Diastolic BP",
        min: 40.0,
        max: 150.0,
        unit: "",
    },
    RangeRule {
        field: ProfileField::Cholesterol,
        label: "Cholesterol",
        min: 100.0,
        max: 400.0,
        unit: " mg/dL",
    },
    RangeRule {
        field: ProfileField::Glucose,
        label: "Glucose",
        min: 50.0,
        max: 400.0,
        unit: " mg/dL",
    },
    RangeRule {
        field: ProfileField::AqiExposure,
        label: "AQI exposure",
        min: 0.0,
        max: 500.0,
        unit: "",
    },
    RangeRule {
        field: ProfileField::HeatExposure,
        label: "Heat exposure",
        min: 0.0,
        max: 100.0,
        unit: "",
    },
];

impl HealthProfile {
    /// Range checks in fixed order; the first violation wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for rule in &RANGE_RULES {
            let Some(value) = self.numeric(rule.field) else {
                continue;
            };
            if !value.is_finite() || value < rule.min || value > rule.max {
                warn!(field = rule.field.name(), "health profile value out of range");
                return Err(ValidationError::OutOfRange {
                    field: rule.field,
                    label: rule.label,
                    min: rule.min,
                    max: rule.max,
                    unit: rule.unit,
                });
            }
        }

        Ok(())
    }

    fn numeric(&self, field: ProfileField) -> Option<f64> {
        match field {
            ProfileField::Age => Some(self.age),
            ProfileField::Bmi => Some(self.bmi),
            ProfileField::SystolicBp => Some(self.systolic_bp),
            ProfileField::DiastolicBp => Some(self.diastolic_bp),
            ProfileField::Cholesterol => Some(self.cholesterol),
            ProfileField::Glucose => Some(self.glucose),
            ProfileField::AqiExposure => Some(self.aqi_exposure),
            ProfileField::HeatExposure => Some(self.heat_exposure),
            ProfileField::Gender | ProfileField::Smoking | ProfileField::PhysicalActivity => None,
        }
    }
}

/// Turn an untyped JSON record into a validated profile.
///
/// Presence is checked for every field in declared order before any range
/// check runs. A field of the wrong JSON type counts as missing: numeric fields
/// must be JSON numbers (numeric strings are rejected) and categorical fields
/// must be strings.
pub fn validate_candidate(candidate: &Value) -> Result<HealthProfile, ValidationError> {
    let empty = Map::new();
    let record = candidate.as_object().unwrap_or(&empty);

    for field in ProfileField::ordered() {
        let present = match record.get(field.name()) {
            Some(value) if field.is_numeric() => value.is_number(),
            Some(value) => value.is_string(),
            None => false,
        };
        if !present {
            warn!(field = field.name(), "health profile missing required field");
            return Err(ValidationError::MissingField(field));
        }
    }

    let profile = HealthProfile {
        age: number(record, ProfileField::Age)?,
        gender: Gender::from_token(token(record, ProfileField::Gender)?),
        bmi: number(record, ProfileField::Bmi)?,
        systolic_bp: number(record, ProfileField::SystolicBp)?,
        diastolic_bp: number(record, ProfileField::DiastolicBp)?,
        cholesterol: number(record, ProfileField::Cholesterol)?,
        glucose: number(record, ProfileField::Glucose)?,
        smoking: SmokingStatus::from_token(token(record, ProfileField::Smoking)?),
        physical_activity: ActivityLevel::from_token(token(
            record,
            ProfileField::PhysicalActivity,
        )?),
        aqi_exposure: number(record, ProfileField::AqiExposure)?,
        heat_exposure: number(record, ProfileField::HeatExposure)?,
    };

    profile.validate()?;
    Ok(profile)
}

fn number(record: &Map<String, Value>, field: ProfileField) -> Result<f64, ValidationError> {
    record
        .get(field.name())
        .and_then(Value::as_f64)
        .ok_or(ValidationError::MissingField(field))
}

fn token(record: &Map<String, Value>, field: ProfileField) -> Result<&str, ValidationError> {
    record
        .get(field.name())
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingField(field))
}

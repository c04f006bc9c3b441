use serde::{Deserialize, Serialize};
use std::fmt;

/// Vitals and environmental exposure submitted for a single assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub age: f64,
    pub gender: Gender,
    pub bmi: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    /// mg/dL
    pub cholesterol: f64,
    /// mg/dL
    pub glucose: f64,
    pub smoking: SmokingStatus,
    pub physical_activity: ActivityLevel,
    /// Air Quality Index on the 0-500 scale.
    pub aqi_exposure: f64,
    /// Heat exposure on a 0-100 scale.
    pub heat_exposure: f64,
}

/// Accepted and carried through, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Current,
    Former,
    Never,
    /// Any token outside the known set; scored like `Never`.
    Other,
}

impl SmokingStatus {
    pub fn from_token(token: &str) -> Self {
        match token {
            "current" => Self::Current,
            "former" => Self::Former,
            "never" => Self::Never,
            _ => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current smoker",
            Self::Former => "Former smoker",
            Self::Never => "Never smoked",
            Self::Other => "Unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    High,
    Moderate,
    Low,
    /// Any token outside the known set; scored like `Low`.
    Other,
}

impl ActivityLevel {
    pub fn from_token(token: &str) -> Self {
        match token {
            "high" => Self::High,
            "moderate" => Self::Moderate,
            "low" => Self::Low,
            _ => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::Other => "Unspecified",
        }
    }
}

/// The eleven required input fields, in the order presence is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Age,
    Gender,
    Bmi,
    SystolicBp,
    DiastolicBp,
    Cholesterol,
    Glucose,
    Smoking,
    PhysicalActivity,
    AqiExposure,
    HeatExposure,
}

impl ProfileField {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::Age,
            Self::Gender,
            Self::Bmi,
            Self::SystolicBp,
            Self::DiastolicBp,
            Self::Cholesterol,
            Self::Glucose,
            Self::Smoking,
            Self::PhysicalActivity,
            Self::AqiExposure,
            Self::HeatExposure,
        ]
    }

    /// Key used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Bmi => "bmi",
            Self::SystolicBp => "systolic_bp",
            Self::DiastolicBp => "diastolic_bp",
            Self::Cholesterol => "cholesterol",
            Self::Glucose => "glucose",
            Self::Smoking => "smoking",
            Self::PhysicalActivity => "physical_activity",
            Self::AqiExposure => "aqi_exposure",
            Self::HeatExposure => "heat_exposure",
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Gender | Self::Smoking | Self::PhysicalActivity)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

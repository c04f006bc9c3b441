use clap::Args;
use health_risk::assessment::{
    assess_profile, validate_candidate, AssessmentError, HealthProfile, Impact, RiskAssessment,
};
use health_risk::error::AppError;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Profile JSON file (reads stdin when omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Print the raw assessment record instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { input, json } = args;

    let raw = match input {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };
    let candidate: Value = serde_json::from_str(&raw)?;
    let profile = validate_candidate(&candidate).map_err(AssessmentError::from)?;
    let assessment = assess_profile(&profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", render_assessment(&profile, &assessment));
    }

    Ok(())
}

pub(crate) fn render_assessment(profile: &HealthProfile, assessment: &RiskAssessment) -> String {
    let scores = assessment.scores();
    let mut out = String::new();

    out.push_str("Health risk assessment\n");
    out.push_str(&format!(
        "Overall score: {} ({})\n",
        scores.overall,
        scores.risk_level.label()
    ));

    out.push_str("\nProfile\n");
    out.push_str(&format!("- Age: {}\n", profile.age));
    out.push_str(&format!("- BMI: {}\n", profile.bmi));
    out.push_str(&format!(
        "- Blood pressure: {}/{}\n",
        profile.systolic_bp, profile.diastolic_bp
    ));
    out.push_str(&format!("- Smoking: {}\n", profile.smoking.label()));
    out.push_str(&format!(
        "- Physical activity: {}\n",
        profile.physical_activity.label()
    ));
    out.push_str(&format!(
        "- AQI exposure: {} | Heat exposure: {}\n",
        profile.aqi_exposure, profile.heat_exposure
    ));

    out.push_str("\nDomain scores\n");
    for (label, score) in [
        ("Cardiovascular", scores.cardiovascular),
        ("Respiratory", scores.respiratory),
        ("Metabolic", scores.metabolic),
        ("Environmental", scores.environmental),
    ] {
        out.push_str(&format!("- {label}: {score}\n"));
    }

    if assessment.key_factors.is_empty() {
        out.push_str("\nKey factors: none\n");
    } else {
        out.push_str("\nKey factors\n");
        for factor in &assessment.key_factors {
            let sign = match factor.impact {
                Impact::Positive => '+',
                Impact::Negative => '-',
            };
            out.push_str(&format!("- [{sign}] {}: {}\n", factor.factor, factor.value));
        }
    }

    out.push_str("\nRecommendations\n");
    for (index, advice) in assessment.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, advice));
    }

    out
}

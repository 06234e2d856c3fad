//! Presentation assembly: pure formatting, no business logic beyond
//! value→label lookup.

use serde_json::{Map, Value};

use crate::api::types::PredictResponse;
use crate::domain::{AgeUnit, FeatureVector, PatientRecord};
use crate::explain::{FactorLists, NarrationTables};
use crate::ml::Prediction;

/// Assemble the full response from the pipeline outputs.
pub fn assemble(
    record: &PatientRecord,
    prediction: &Prediction,
    factors: FactorLists,
    tables: &NarrationTables,
    accuracy: f64,
) -> PredictResponse {
    let features = FeatureVector::engineer(record, AgeUnit::Years);

    let mut personal_info = Map::new();
    personal_info.insert("Age".to_string(), Value::from(features.age_years() as i64));
    personal_info.insert(
        "Gender".to_string(),
        coded_label(tables, "Gender", record.gender),
    );
    personal_info.insert("Height (cm)".to_string(), Value::from(record.height));
    personal_info.insert("Weight (kg)".to_string(), Value::from(record.weight));

    let mut calculated_info = Map::new();
    calculated_info.insert("BMI".to_string(), Value::from(round2(features.bmi())));
    calculated_info.insert(
        "Pulse Pressure".to_string(),
        Value::from(round2(features.pulse_pressure())),
    );
    calculated_info.insert("Systolic BP".to_string(), Value::from(record.ap_hi));
    calculated_info.insert("Diastolic BP".to_string(), Value::from(record.ap_lo));
    calculated_info.insert(
        "Cholesterol".to_string(),
        coded_label(tables, "Cholesterol", record.cholesterol),
    );
    calculated_info.insert(
        "Glucose".to_string(),
        coded_label(tables, "Glucose", record.gluc),
    );
    calculated_info.insert(
        "Smoking".to_string(),
        coded_label(tables, "Smoking", record.smoke),
    );
    calculated_info.insert(
        "Alcohol Intake".to_string(),
        coded_label(tables, "Alcohol Intake", record.alco),
    );
    calculated_info.insert(
        "Physical Activity".to_string(),
        coded_label(tables, "Physical Activity", record.active),
    );

    PredictResponse {
        probability: round2(prediction.probability),
        risk_level: prediction.tier.as_str().to_string(),
        model_accuracy: round2(accuracy * 100.0),
        healthy_factors: factors.healthy,
        unhealthy_factors: factors.unhealthy,
        inputs: record.clone(),
        personal_info,
        calculated_info,
    }
}

/// Label for a coded value; unmapped codes echo the number.
fn coded_label(tables: &NarrationTables, display_name: &str, code: i64) -> Value {
    match tables.value_label(display_name, code) {
        Some(label) => Value::from(label),
        None => Value::from(code),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskTier;
    use crate::explain::FactorLists;

    fn fixture() -> PatientRecord {
        PatientRecord {
            age: 50.0,
            gender: 1,
            height: 170.0,
            weight: 70.0,
            ap_hi: 120,
            ap_lo: 80,
            cholesterol: 1,
            gluc: 1,
            smoke: 0,
            alco: 0,
            active: 1,
        }
    }

    fn prediction(p: f64) -> Prediction {
        Prediction {
            probability: p,
            tier: RiskTier::from_probability(p),
            attributions: vec![0.0; 13],
        }
    }

    #[test]
    fn fixture_yields_expected_bmi_and_pulse_pressure() {
        let response = assemble(
            &fixture(),
            &prediction(0.5),
            FactorLists::default(),
            &NarrationTables::default(),
            0.7312,
        );
        assert_eq!(response.calculated_info["BMI"], Value::from(24.22));
        assert_eq!(response.calculated_info["Pulse Pressure"], Value::from(40.0));
    }

    #[test]
    fn labels_are_translated() {
        let response = assemble(
            &fixture(),
            &prediction(0.5),
            FactorLists::default(),
            &NarrationTables::default(),
            0.7312,
        );
        assert_eq!(response.personal_info["Gender"], Value::from("Male"));
        assert_eq!(response.personal_info["Age"], Value::from(50));
        assert_eq!(response.calculated_info["Cholesterol"], Value::from("Normal"));
        assert_eq!(response.calculated_info["Smoking"], Value::from("No"));
        assert_eq!(response.calculated_info["Physical Activity"], Value::from("Yes"));
    }

    #[test]
    fn unmapped_codes_echo_the_number() {
        let mut record = fixture();
        record.cholesterol = 7;
        let response = assemble(
            &record,
            &prediction(0.5),
            FactorLists::default(),
            &NarrationTables::default(),
            0.7312,
        );
        assert_eq!(response.calculated_info["Cholesterol"], Value::from(7));
    }

    #[test]
    fn probability_and_accuracy_are_rounded() {
        let response = assemble(
            &fixture(),
            &prediction(0.66789),
            FactorLists::default(),
            &NarrationTables::default(),
            0.73125,
        );
        assert_eq!(response.probability, 0.67);
        assert_eq!(response.model_accuracy, 73.13);
        assert_eq!(response.risk_level, "High");
    }
}

//! Narration lookup tables.
//!
//! Display names, per-factor risk descriptions and value→label maps are
//! plain data with compiled-in defaults matching the dataset's coding, and
//! can be overridden from a TOML file so the narration text is testable and
//! editable independently of the numeric pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationTables {
    /// Feature name → user-facing display name.
    pub display_names: BTreeMap<String, String>,
    /// Display name → description used when the factor is adverse.
    pub risk_texts: BTreeMap<String, String>,
    /// Display name → (value code → label), for ordinal/binary fields.
    pub value_labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl NarrationTables {
    /// Built-in defaults, with an optional TOML override file.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Display name for a schema feature, falling back to the raw name.
    pub fn display_name<'a>(&'a self, feature: &'a str) -> &'a str {
        self.display_names
            .get(feature)
            .map(String::as_str)
            .unwrap_or(feature)
    }

    /// Adverse-factor description; empty when no text is configured.
    pub fn risk_text(&self, display_name: &str) -> String {
        self.risk_texts.get(display_name).cloned().unwrap_or_default()
    }

    /// Generic description for a factor sitting in its healthy range.
    pub fn healthy_range_text(&self, display_name: &str) -> String {
        format!("{display_name} is in a healthy range")
    }

    /// Translate a coded value; `None` when the code is unmapped.
    pub fn value_label(&self, display_name: &str, code: i64) -> Option<&str> {
        self.value_labels
            .get(display_name)?
            .get(&code.to_string())
            .map(String::as_str)
    }
}

impl Default for NarrationTables {
    fn default() -> Self {
        let display_names = [
            ("ap_hi", "Systolic BP"),
            ("ap_lo", "Diastolic BP"),
            ("bmi", "Body Mass Index"),
            ("age_years", "Age"),
            ("cholesterol", "Cholesterol"),
            ("gluc", "Glucose"),
            ("pulse_pressure", "Pulse Pressure"),
            ("smoke", "Smoking"),
            ("alco", "Alcohol Intake"),
            ("active", "Physical Activity"),
        ];

        let risk_texts = [
            ("Systolic BP", "High blood pressure increases strain on the heart."),
            ("Diastolic BP", "Low diastolic pressure reduces blood flow efficiency."),
            ("Body Mass Index", "Higher BMI is linked to obesity and heart issues."),
            ("Cholesterol", "High cholesterol can clog arteries."),
            ("Glucose", "High glucose levels indicate possible diabetes risk."),
            ("Pulse Pressure", "Large pulse pressure suggests arterial stiffness."),
            ("Smoking", "Smoking damages blood vessels and heart tissue."),
            ("Alcohol Intake", "Frequent alcohol intake affects blood pressure."),
            ("Physical Activity", "Being active protects heart health."),
        ];

        let yes_no = [("0", "No"), ("1", "Yes")];
        let ordinal = [("1", "Normal"), ("2", "Above Normal"), ("3", "Well Above Normal")];
        let value_labels = [
            ("Gender", vec![("1", "Male"), ("2", "Female")]),
            ("Cholesterol", ordinal.to_vec()),
            ("Glucose", ordinal.to_vec()),
            ("Smoking", yes_no.to_vec()),
            ("Alcohol Intake", yes_no.to_vec()),
            ("Physical Activity", yes_no.to_vec()),
        ];

        Self {
            display_names: to_map(&display_names),
            risk_texts: to_map(&risk_texts),
            value_labels: value_labels
                .into_iter()
                .map(|(k, v)| (k.to_string(), to_map(&v)))
                .collect(),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

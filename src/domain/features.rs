//! Feature engineering shared by training and inference.
//!
//! The scaler and classifier are fitted against [`FEATURE_NAMES`] in this
//! exact order; every feature vector built here carries the same layout, so
//! a schema disagreement can only come from a stale artifact on disk (and is
//! rejected by the scaler, see `ml::scaler`).

use crate::domain::patient::PatientRecord;

/// Fixed ordered feature schema the model is fitted on.
pub const FEATURE_NAMES: [&str; 13] = [
    "gender",
    "height",
    "weight",
    "ap_hi",
    "ap_lo",
    "cholesterol",
    "gluc",
    "smoke",
    "alco",
    "active",
    "bmi",
    "pulse_pressure",
    "age_years",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Unit of the `age` field on a [`PatientRecord`].
///
/// The training CSV stores age in days; API callers submit years. Making the
/// unit an explicit parameter keeps the train/inference asymmetry visible
/// instead of baking it into two diverging code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Days,
    Years,
}

/// One engineered feature vector, ordered per [`FEATURE_NAMES`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Derive the engineered features from a raw record.
    ///
    /// `bmi = weight / (height/100)^2`, `pulse_pressure = ap_hi - ap_lo`,
    /// `age_years` is `age` as-is for [`AgeUnit::Years`] and `age / 365` for
    /// [`AgeUnit::Days`]. Zero height yields an infinite BMI; guarding that
    /// is out of scope.
    pub fn engineer(record: &PatientRecord, age_unit: AgeUnit) -> Self {
        let bmi = record.weight / (record.height / 100.0).powi(2);
        let pulse_pressure = (record.ap_hi - record.ap_lo) as f64;
        let age_years = match age_unit {
            AgeUnit::Days => record.age / 365.0,
            AgeUnit::Years => record.age,
        };

        Self {
            values: [
                record.gender as f64,
                record.height,
                record.weight,
                record.ap_hi as f64,
                record.ap_lo as f64,
                record.cholesterol as f64,
                record.gluc as f64,
                record.smoke as f64,
                record.alco as f64,
                record.active as f64,
                bmi,
                pulse_pressure,
                age_years,
            ],
        }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn bmi(&self) -> f64 {
        self.values[10]
    }

    pub fn pulse_pressure(&self) -> f64 {
        self.values[11]
    }

    pub fn age_years(&self) -> f64 {
        self.values[12]
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::PatientRecord;
use crate::explain::Factor;

// ============================================================================
// Prediction Types
// ============================================================================

/// Full response for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Positive-class probability, rounded to 2 decimals.
    pub probability: f64,
    /// "Low" | "Medium" | "High".
    pub risk_level: String,
    /// Held-out accuracy as a percentage, rounded to 2 decimals.
    pub model_accuracy: f64,
    pub healthy_factors: Vec<Factor>,
    pub unhealthy_factors: Vec<Factor>,
    /// Echo of the submitted record.
    pub inputs: PatientRecord,
    /// Display grouping: age, gender label, height, weight.
    pub personal_info: Map<String, Value>,
    /// Display grouping: derived values and translated ordinal/binary labels.
    pub calculated_info: Map<String, Value>,
}

// ============================================================================
// Status Types
// ============================================================================

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub usage: String,
    pub model_accuracy: f64,
    pub uptime_seconds: i64,
}

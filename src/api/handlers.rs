use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::api::response::assemble;
use crate::api::state::AppState;
use crate::api::types::{PredictResponse, StatusResponse};
use crate::domain::PatientRecord;
use crate::explain::{narrate, FeatureAttributions};

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Cardio Risk Prediction API is running".to_string(),
        usage: "Send a POST request to /predict with patient data".to_string(),
        model_accuracy: state.artifacts.accuracy,
        uptime_seconds: state.uptime_seconds(),
    })
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<PatientRecord>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, String)> {
    let prediction = state
        .artifacts
        .predict(&record)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    debug!(
        probability = prediction.probability,
        tier = prediction.tier.as_str(),
        "prediction computed"
    );

    let attributions = FeatureAttributions::new(prediction.attributions.clone())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let factors = narrate(&record, &attributions, &state.tables);

    Ok(Json(assemble(
        &record,
        &prediction,
        factors,
        &state.tables,
        state.artifacts.accuracy,
    )))
}

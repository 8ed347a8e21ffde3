use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use log::{debug, error, info};

use crate::pipelines::sequence_classification::ClassifyError;

use super::{
    types::{HealthResponse, PredictRequest, PredictResponse},
    ApiError, AppState,
};

/// Classify the submitted text
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected predict request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let text = request.text.unwrap_or_default();

    if text.is_empty() {
        debug!("Predict called without text");
        return Err(ApiError::MissingInput);
    }

    let chars = text.chars().count();
    let classifier = Arc::clone(&state.classifier);

    let prediction = tokio::task::spawn_blocking(move || classifier.classify(&text))
        .await
        .map_err(|e| {
            error!("Inference task for {}-character input did not complete: {}", chars, e);
            ApiError::Inference
        })?
        .map_err(|e| match e {
            ClassifyError::MissingInput => ApiError::MissingInput,
            ClassifyError::Inference(reason) => {
                error!("Inference failed for {}-character input: {}", chars, reason);
                ApiError::Inference
            }
        })?;

    info!(
        "Predicted {} ({}) for {}-character input",
        prediction.label, prediction.confidence, chars
    );

    Ok(Json(prediction.into()))
}

/// Report readiness and the label order in use
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        labels: state.classifier.labels().iter().collect(),
    })
}

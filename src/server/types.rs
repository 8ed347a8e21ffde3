use serde::{Deserialize, Serialize};

use crate::pipelines::sequence_classification::{Label, Prediction};

/// Body of `POST /predict`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PredictRequest {
    /// The text to classify. Absent and `null` are both treated as missing.
    #[serde(default)]
    pub text: Option<String>,
}

/// Successful `POST /predict` response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictResponse {
    /// The predicted label
    pub prediction: Label,

    /// Probability of the predicted label, rounded to 4 decimal places
    pub confidence: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.label,
            confidence: prediction.confidence,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// A human readable message
    pub error: String,
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    /// Always "ok" once the server is accepting connections
    pub status: String,

    /// Labels in model output order
    pub labels: Vec<Label>,
}

use serde::{Deserialize, Serialize};

/// Query string of `GET /map`, as reported by the browser's location callback
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MapQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub error: Option<String>,
}

/// Form posted by the "Add Marker" button
#[derive(Debug, Deserialize)]
pub struct LabelForm {
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

use serde::{Deserialize, Serialize};

use crate::domain::detection::DetectionResult;

/// Respuesta 200 de `POST /detect`. El frontend espera exactamente
/// `{"success": true, "resultData": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    #[serde(rename = "resultData")]
    pub result_data: DetectionResult,
}

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::adapters::http::state::HttpState;
use crate::application::dto::DetectResponse;
use crate::domain::errors::DomainError;

fn no_file_uploaded() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": "No file uploaded" })),
    )
}

/// `POST /detect`: formulario multipart con el campo `file`.
/// Un campo ausente, sin nombre de fichero o vacío se rechaza con 400
/// antes de tocar el disco.
pub async fn detect(State(st): State<HttpState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut upload: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let has_filename = field.file_name().map(|f| !f.is_empty()).unwrap_or(false);
        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Cuerpo multipart truncado: {}", e);
                break;
            }
        };
        if has_filename && !bytes.is_empty() {
            upload = Some(bytes.to_vec());
        }
        break;
    }

    let Some(bytes) = upload else {
        return no_file_uploaded().into_response();
    };

    match st.detection.submit(&bytes).await {
        Ok(result) => Json(DetectResponse {
            success: true,
            result_data: result,
        })
        .into_response(),
        Err(DomainError::InvalidInput(_)) => no_file_uploaded().into_response(),
        Err(e) => {
            error!("Fallo procesando la detección: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `GET /api/result`: último resultado almacenado, o 404 si aún no hay.
pub async fn get_result(State(st): State<HttpState>) -> impl IntoResponse {
    match st.detection.latest().await {
        Ok(result) => Json(result).into_response(),
        Err(DomainError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No results yet" })),
        )
            .into_response(),
        Err(e) => {
            error!("Resultado persistido ilegible: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

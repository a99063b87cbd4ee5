use std::sync::Arc;
use crate::application::services::DetectionService;

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene el servicio (Caso de Uso).
#[derive(Clone)]
pub struct HttpState {
    /// Servicio que orquesta subida de imagen, inferencia y resultado único.
    pub detection: Arc<DetectionService>,
}

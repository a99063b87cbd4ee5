use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::DetectorPort;
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
    model::YoloParams,
};

/// Adaptador del detector opaco sobre una sesión ONNX. La sesión no es
/// reentrante, así que se protege con un mutex y la inferencia se despacha
/// a un hilo bloqueante de Tokio.
pub struct OnnxDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
    params: YoloParams,
}

impl OnnxDetector {
    pub fn load(model_path: &str, params: YoloParams) -> Result<Self> {
        if !Path::new(model_path).exists() {
            anyhow::bail!("modelo YOLO no encontrado en {}", model_path);
        }
        let engine = OnnxYoloEngine::load(model_path)?;
        info!("Modelo YOLO cargado desde {}", model_path);
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            params,
        })
    }
}

#[async_trait]
impl DetectorPort for OnnxDetector {
    async fn detect(&self, path: &Path) -> DomainResult<Vec<Detection>> {
        let engine = self.engine.clone();
        let params = self.params.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let rgb = image::open(&path)
                .map_err(|e| {
                    DomainError::DetectorFailure(format!("imagen ilegible {:?}: {}", path, e))
                })?
                .to_rgb8();

            let mut engine = engine
                .lock()
                .map_err(|_| DomainError::DetectorFailure("sesión ONNX envenenada".into()))?;
            engine
                .infer(&rgb, &params)
                .map_err(|e| DomainError::DetectorFailure(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::DetectorFailure(format!("tarea de inferencia abortada: {}", e)))?
    }
}

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::info;

use crate::{
    application::ports::{DetectorPort, ResultStorePort, UploadStorePort},
    domain::{
        detection::{summarize_detections, DetectionResult},
        errors::{DomainError, DomainResult},
    },
};

/// Servicio de detección: orquesta el flujo subida → inferencia → resultado.
/// La inferencia es bloqueante y ligada a CPU/acelerador, así que las
/// ejecuciones concurrentes se limitan con un semáforo y se acotan con un
/// timeout explícito.
pub struct DetectionService {
    uploads: Arc<dyn UploadStorePort>,
    detector: Arc<dyn DetectorPort>,
    results: Arc<dyn ResultStorePort>,
    infer_gate: Semaphore,
    infer_timeout: Duration,
}

impl DetectionService {
    pub fn new(
        uploads: Arc<dyn UploadStorePort>,
        detector: Arc<dyn DetectorPort>,
        results: Arc<dyn ResultStorePort>,
        max_inflight: usize,
        infer_timeout: Duration,
    ) -> Self {
        Self {
            uploads,
            detector,
            results,
            infer_gate: Semaphore::new(max_inflight.max(1)),
            infer_timeout,
        }
    }

    /// Procesa una imagen subida: la persiste, invoca el detector y
    /// sobrescribe el resultado único. Devuelve el resultado completo.
    ///
    /// Una entrada vacía falla con `InvalidInput` sin ningún efecto
    /// secundario (ni fichero de subida ni escritura del resultado).
    pub async fn submit(&self, bytes: &[u8]) -> DomainResult<DetectionResult> {
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("No file uploaded".into()));
        }

        let stored = self.uploads.store(bytes).await?;

        let detections = {
            let _permit = self
                .infer_gate
                .acquire()
                .await
                .map_err(|_| DomainError::DetectorFailure("semáforo de inferencia cerrado".into()))?;

            tokio::time::timeout(self.infer_timeout, self.detector.detect(&stored.path))
                .await
                .map_err(|_| {
                    DomainError::DetectorFailure(format!(
                        "inferencia abortada tras {:?}",
                        self.infer_timeout
                    ))
                })??
        };

        info!(
            image = %stored.public_url,
            "Detección completada: [{}]",
            summarize_detections(&detections)
        );

        let result = DetectionResult {
            image_url: stored.public_url,
            detections,
        };
        self.results.save(&result).await?;
        Ok(result)
    }

    /// Lee el último resultado almacenado. `NotFound` es el desenlace
    /// normal cuando todavía no se ha procesado ninguna imagen.
    pub async fn latest(&self) -> DomainResult<DetectionResult> {
        self.results
            .load()
            .await?
            .ok_or_else(|| DomainError::NotFound("No results yet".into()))
    }
}

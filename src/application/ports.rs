use async_trait::async_trait;
use std::path::Path;

use crate::domain::{
    detection::{Detection, DetectionResult, StoredUpload},
    errors::DomainResult,
};

/// Detector opaco: imagen → lista de objetos etiquetados con confianza.
/// No se asume nada más de su contrato (latencia, determinismo).
#[async_trait]
pub trait DetectorPort: Send + Sync {
    async fn detect(&self, path: &Path) -> DomainResult<Vec<Detection>>;
}

/// Almacén de imágenes subidas: persiste los bytes crudos bajo un nombre
/// único y devuelve la referencia (ruta física + URL pública).
#[async_trait]
pub trait UploadStorePort: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> DomainResult<StoredUpload>;
}

/// Almacén de resultado único: guarda exactamente un valor, sobrescrito
/// por completo en cada actualización.
#[async_trait]
pub trait ResultStorePort: Send + Sync {
    /// Sobrescribe el resultado anterior de forma atómica.
    async fn save(&self, result: &DetectionResult) -> DomainResult<()>;
    /// `Ok(None)` significa "todavía no hay resultado" (no es un fallo);
    /// un valor persistido ilegible sí es `Err(StorageFailure)`.
    async fn load(&self) -> DomainResult<Option<DetectionResult>>;
}

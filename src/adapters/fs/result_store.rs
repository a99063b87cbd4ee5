use anyhow::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::ResultStorePort;
use crate::domain::{
    detection::DetectionResult,
    errors::{DomainError, DomainResult},
};

/// Almacén de resultado único respaldado por un JSON en disco
/// (`<static>/results/latest_result.json`).
///
/// Las escrituras se serializan con un mutex y pasan por un fichero
/// temporal seguido de `rename`, que en el mismo sistema de ficheros es
/// atómico: un lector concurrente ve siempre el valor anterior completo
/// o el nuevo completo, nunca bytes parciales.
pub struct FsResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FsResultStore {
    pub fn new(static_dir: impl Into<PathBuf>) -> Result<Self> {
        let results_dir = static_dir.into().join("results");
        std::fs::create_dir_all(&results_dir)?;
        Ok(Self {
            path: results_dir.join("latest_result.json"),
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl ResultStorePort for FsResultStore {
    async fn save(&self, result: &DetectionResult) -> DomainResult<()> {
        let json = serde_json::to_vec(result)
            .map_err(|e| DomainError::StorageFailure(format!("serializando resultado: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        // Nombre temporal único por escritura, en el mismo directorio para
        // que el rename no cruce sistemas de ficheros.
        let tmp = self
            .path
            .with_file_name(format!(".latest_result.{}.tmp", Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| DomainError::StorageFailure(format!("escribiendo resultado: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DomainError::StorageFailure(format!("publicando resultado: {}", e)))?;

        Ok(())
    }

    async fn load(&self) -> DomainResult<Option<DetectionResult>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::StorageFailure(format!(
                    "leyendo resultado: {}",
                    e
                )))
            }
        };

        let result = serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::StorageFailure(format!("resultado corrupto: {}", e)))?;
        Ok(Some(result))
    }
}

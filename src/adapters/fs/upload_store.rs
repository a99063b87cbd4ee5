use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use crate::application::ports::UploadStorePort;
use crate::domain::{
    detection::StoredUpload,
    errors::{DomainError, DomainResult},
};

/// Almacén de subidas sobre disco. Cada imagen se guarda bajo
/// `<static>/uploads/<token>.jpg` con un token aleatorio de 128 bits;
/// no se deduplica ni se valida el contenido.
pub struct FsUploadStore {
    uploads_dir: PathBuf,
    public_prefix: String,
}

impl FsUploadStore {
    pub fn new(static_dir: impl Into<PathBuf>) -> Result<Self> {
        let uploads_dir = static_dir.into().join("uploads");
        std::fs::create_dir_all(&uploads_dir)?;
        Ok(Self {
            uploads_dir,
            public_prefix: "/static/uploads".to_string(),
        })
    }
}

#[async_trait]
impl UploadStorePort for FsUploadStore {
    async fn store(&self, bytes: &[u8]) -> DomainResult<StoredUpload> {
        // La extensión es fija: el original guarda siempre ".jpg" sin
        // inspeccionar los bytes.
        let filename = format!("{}.jpg", Uuid::new_v4().simple());
        let path = self.uploads_dir.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::StorageFailure(format!("guardando subida: {}", e)))?;

        Ok(StoredUpload {
            path,
            public_url: format!("{}/{}", self.public_prefix, filename),
        })
    }
}

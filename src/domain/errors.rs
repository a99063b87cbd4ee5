use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Error del detector: {0}")]
    DetectorFailure(String),
    #[error("Error de almacenamiento: {0}")]
    StorageFailure(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

// errors.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
  #[error("Error de base de datos: {0}")]
  Database(#[from] diesel::result::Error),
  #[error("Error del pool de conexiones: {0}")]
  Pool(#[from] r2d2::Error),
  #[error("Error de migración del esquema: {0}")]
  Migration(String),
  #[error("Error de configuración: {0}")]
  Config(String),
  #[error("Error de validación: {0}")]
  Validation(String),
}


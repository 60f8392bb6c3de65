// errors.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("No se pudo construir el pool de trabajadores: {0}")]
  PoolBuild(#[from] rayon::ThreadPoolBuildError),
  #[error("Configuración inválida: {0}")]
  InvalidConfiguration(String),
}

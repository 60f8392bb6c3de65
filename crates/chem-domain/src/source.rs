// source.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identidad de una fuente de datos externa. La tripleta
/// `(name, version, file_name)` es única en la capa archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceIdentity {
  name: String,
  version: String,
  file_name: String,
}

impl SourceIdentity {
  pub fn new(name: &str, version: &str, file_name: &str) -> Result<Self, DomainError> {
    if name.trim().is_empty() {
      return Err(DomainError::ValidationError("El nombre de la fuente no puede estar vacío".to_string()));
    }
    if version.trim().is_empty() {
      return Err(DomainError::ValidationError("La versión de la fuente no puede estar vacía".to_string()));
    }
    if file_name.trim().is_empty() {
      return Err(DomainError::ValidationError("El archivo de la fuente no puede estar vacío".to_string()));
    }
    Ok(Self { name: name.to_string(), version: version.to_string(), file_name: file_name.to_string() })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn file_name(&self) -> &str {
    &self.file_name
  }
}

impl fmt::Display for SourceIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} v{} ({})", self.name, self.version, self.file_name)
  }
}

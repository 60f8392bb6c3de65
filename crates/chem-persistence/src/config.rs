// config.rs
use crate::PersistenceError;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_CREATED_BY: &str = "user";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Configuración del almacén.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
  pub database_url: String,
  pub pool_size: u32,
  pub chunk_size: usize,
  pub created_by: String,
  pub busy_timeout_ms: u64,
  pub create_tables_on_open: bool,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { database_url: in_memory_url(),
           pool_size: DEFAULT_POOL_SIZE,
           chunk_size: DEFAULT_CHUNK_SIZE,
           created_by: DEFAULT_CREATED_BY.to_string(),
           busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
           create_tables_on_open: true }
  }
}

impl StoreConfig {
  /// Configuración para una base de datos en archivo.
  pub fn for_file(path: &str) -> Self {
    Self { database_url: path.to_string(), ..Self::default() }
  }

  /// Lee la configuración del entorno (cargando `.env` si existe):
  /// `CHEMROUTE_DB_URL` (o `DATABASE_URL`), `CHEMROUTE_DB_POOL_SIZE`,
  /// `CHEMROUTE_CHUNK_SIZE`, `CHEMROUTE_DB_USER` y
  /// `CHEMROUTE_BUSY_TIMEOUT_MS`.
  pub fn from_env() -> Result<Self, PersistenceError> {
    dotenvy::dotenv().ok();
    let defaults = Self::default();
    let database_url = std::env::var("CHEMROUTE_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                                         .unwrap_or(defaults.database_url);
    let cfg = Self { database_url,
                     pool_size: env_or("CHEMROUTE_DB_POOL_SIZE", defaults.pool_size)?,
                     chunk_size: env_or("CHEMROUTE_CHUNK_SIZE", defaults.chunk_size)?,
                     created_by: std::env::var("CHEMROUTE_DB_USER").unwrap_or(defaults.created_by),
                     busy_timeout_ms: env_or("CHEMROUTE_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms)?,
                     create_tables_on_open: defaults.create_tables_on_open };
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<(), PersistenceError> {
    if self.database_url.trim().is_empty() {
      return Err(PersistenceError::Config("la URL de la base de datos está vacía".to_string()));
    }
    if self.pool_size == 0 {
      return Err(PersistenceError::Config("el tamaño del pool debe ser mayor que cero".to_string()));
    }
    if self.chunk_size == 0 {
      return Err(PersistenceError::Config("el tamaño de lote debe ser mayor que cero".to_string()));
    }
    Ok(())
  }

  /// Las bases en memoria no admiten WAL.
  pub fn is_in_memory(&self) -> bool {
    self.database_url == ":memory:" || self.database_url.contains("mode=memory")
  }
}

/// URI de una base en memoria compartida entre las conexiones del pool.
pub fn in_memory_url() -> String {
  format!("file:chemroute_{}?mode=memory&cache=shared", Uuid::new_v4().simple())
}

fn env_or<T>(key: &str, default: T) -> Result<T, PersistenceError>
  where T: FromStr,
        T::Err: std::fmt::Display
{
  match std::env::var(key) {
    Ok(v) => v.trim().parse::<T>().map_err(|e| PersistenceError::Config(format!("{}={}: {}", key, v, e))),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let cfg = StoreConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.is_in_memory());
    assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
  }

  #[test]
  fn file_config_is_not_in_memory() {
    let cfg = StoreConfig::for_file("/tmp/chemroute.db");
    assert!(!cfg.is_in_memory());
  }

  #[test]
  fn zero_chunk_size_is_rejected() {
    let cfg = StoreConfig { chunk_size: 0, ..StoreConfig::default() };
    assert!(matches!(cfg.validate(), Err(PersistenceError::Config(_))));
  }
}

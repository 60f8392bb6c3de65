use chem_domain::{BuildingBlockPolicy, ChemicalKind, SourceIdentity};
use chem_persistence::{DieselChemRepository, StoreConfig};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use uuid::Uuid;

/// Guarda los mensajes de nivel error emitidos por el crate.
struct CaptureLogger;

static ERRORS: Mutex<Vec<String>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

impl Log for CaptureLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= Level::Error
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      ERRORS.lock().expect("log buffer").push(record.args().to_string());
    }
  }

  fn flush(&self) {}
}

fn install_logger() {
  INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(LevelFilter::Error);
      });
}

/// Los tests comparten el logger; cada uno busca su propio mensaje.
fn logged(fragment: &str) -> bool {
  ERRORS.lock().expect("log buffer").iter().any(|m| m.contains(fragment) && m.contains("no such table"))
}

/// Repositorio sobre un archivo nuevo con el esquema ya eliminado.
fn open_dropped_repo() -> (DieselChemRepository, PathBuf) {
  install_logger();
  let tmp_path = std::env::temp_dir().join(format!("chemroute_test_{}.db", Uuid::new_v4()));
  let cfg = StoreConfig { chunk_size: 10, pool_size: 2, ..StoreConfig::for_file(tmp_path.to_str().expect("utf8 path")) };
  let repo = DieselChemRepository::open(&cfg).expect("failed to open repo");
  repo.drop_all_tables().expect("drop");
  (repo, tmp_path)
}

fn cleanup(path: PathBuf) {
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
  }
}

fn identity(inputs: &[String]) -> Vec<Option<String>> {
  inputs.iter().map(|s| Some(s.clone())).collect()
}

#[test]
fn failed_source_registration_is_logged() {
  let (repo, path) = open_dropped_repo();
  let source = SourceIdentity::new("zinc", "1", "bb.smi").expect("source");
  assert!(repo.insert_archive_compounds(&["CCO".to_string()], &source).is_err());
  assert!(logged("could not register source zinc"));
  drop(repo);
  cleanup(path);
}

#[test]
fn failed_migration_input_is_logged() {
  let (repo, path) = open_dropped_repo();
  assert!(repo.migrate_archive_to_workbench_compounds(&identity, BuildingBlockPolicy::Keep, None).is_err());
  assert!(logged("migrate chemical compounds: could not read input"));
  drop(repo);
  cleanup(path);
}

#[test]
fn failed_paged_count_is_logged() {
  let (repo, path) = open_dropped_repo();
  assert!(repo.select_archive_records(ChemicalKind::Reaction).is_err());
  assert!(logged("paged query could not be counted"));
  drop(repo);
  cleanup(path);
}

#[test]
fn failed_route_query_is_logged() {
  let (repo, path) = open_dropped_repo();
  assert!(repo.select_reversed_synthesis_routes("CCO", 3).is_err());
  assert!(logged("route query for"));
  drop(repo);
  cleanup(path);
}

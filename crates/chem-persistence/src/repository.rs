// repository.rs
use crate::models::{ArchiveEntityRow, ArchiveEntitySourceRow, ArchiveSourceRow, WorkbenchCompoundRow,
                    WorkbenchCompoundSourceRow, WorkbenchEntityRow, WorkbenchEntitySourceRow};
use crate::pipeline::{self, ChunkSummary};
use crate::query::{self, Chunks, RoleFilter};
use crate::{routes, schema, tables, PersistenceError, StoreConfig};
use chem_domain::{BuildingBlockPolicy, ChemicalKind, CompoundPatternMatcher, CompoundRef, CompoundStandardizer,
                  ReactionStandardizer, RouteForest, RouteNode, SourceIdentity};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sql_types::BigInt;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// PRAGMAs aplicados a cada conexión que entrega el pool.
#[derive(Debug, Clone, Copy)]
struct ConnectionSetup {
  busy_timeout_ms: u64,
  wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;", self.busy_timeout_ms);
    if self.wal {
      pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

#[derive(QueryableByName)]
struct TableCount {
  #[diesel(sql_type = BigInt)]
  count: i64,
}

/// Repositorio Diesel sobre SQLite: esquema, ingesta, migración, consultas
/// y reconstrucción de rutas.
pub struct DieselChemRepository {
  pool: DbPool,
  config: StoreConfig,
}

impl DieselChemRepository {
  pub fn open(config: &StoreConfig) -> Result<Self, PersistenceError> {
    config.validate()?;
    let setup = ConnectionSetup { busy_timeout_ms: config.busy_timeout_ms, wal: !config.is_in_memory() };
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    let mut builder = Pool::builder().max_size(config.pool_size).connection_customizer(Box::new(setup));
    if config.is_in_memory() {
      // La base compartida vive mientras quede una conexión abierta.
      builder = builder.max_lifetime(None).idle_timeout(None);
    }
    let pool = builder.build(manager)?;
    let repo = Self { pool, config: config.clone() };
    log::info!("opened chemical store at {} (pool size {})", config.database_url, config.pool_size);
    if config.create_tables_on_open {
      repo.create_all_tables()?;
    }
    Ok(repo)
  }

  /// Abre el repositorio con `StoreConfig::from_env`.
  pub fn from_env() -> Result<Self, PersistenceError> {
    Self::open(&StoreConfig::from_env()?)
  }

  pub fn config(&self) -> &StoreConfig {
    &self.config
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  /// Conexión del pool con los PRAGMAs ya aplicados.
  pub fn connection(&self) -> Result<DbConn, PersistenceError> {
    self.pool.get().map_err(|e| {
                     log::error!("no connection available for {}: {}", self.config.database_url, e);
                     e.into()
                   })
  }

  pub fn create_all_tables(&self) -> Result<(), PersistenceError> {
    let mut conn = self.connection()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| PersistenceError::Migration(e.to_string()))?;
    log::info!("schema ready ({} migrations applied)", applied.len());
    Ok(())
  }

  pub fn drop_all_tables(&self) -> Result<(), PersistenceError> {
    let mut conn = self.connection()?;
    let reverted = conn.revert_all_migrations(MIGRATIONS).map_err(|e| PersistenceError::Migration(e.to_string()))?;
    log::info!("schema dropped ({} migrations reverted)", reverted.len());
    Ok(())
  }

  /// Filas por tabla; las tablas que no existen se omiten.
  pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, PersistenceError> {
    let mut conn = self.connection()?;
    let mut out = Vec::with_capacity(tables::ALL_TABLES.len());
    for table in tables::ALL_TABLES {
      let sql = format!("SELECT COUNT(*) AS count FROM {}", table);
      match diesel::sql_query(sql).get_result::<TableCount>(&mut conn) {
        Ok(row) => out.push((table, row.count)),
        Err(diesel::result::Error::DatabaseError(_, info)) if info.message().contains("no such table") => {}
        Err(e) => return Err(e.into()),
      }
    }
    Ok(out)
  }

  // Ingesta

  pub fn insert_archive_compounds(&self, smiles: &[String], source: &SourceIdentity) -> Result<ChunkSummary, PersistenceError> {
    self.insert_archive(ChemicalKind::Compound, smiles, source)
  }

  pub fn insert_archive_compound_patterns(&self,
                                          smarts: &[String],
                                          source: &SourceIdentity)
                                          -> Result<ChunkSummary, PersistenceError> {
    self.insert_archive(ChemicalKind::CompoundPattern, smarts, source)
  }

  pub fn insert_archive_reactions(&self, smiles: &[String], source: &SourceIdentity) -> Result<ChunkSummary, PersistenceError> {
    self.insert_archive(ChemicalKind::Reaction, smiles, source)
  }

  pub fn insert_archive_reaction_patterns(&self,
                                          smarts: &[String],
                                          source: &SourceIdentity)
                                          -> Result<ChunkSummary, PersistenceError> {
    self.insert_archive(ChemicalKind::ReactionPattern, smarts, source)
  }

  fn insert_archive(&self,
                    kind: ChemicalKind,
                    values: &[String],
                    source: &SourceIdentity)
                    -> Result<ChunkSummary, PersistenceError> {
    pipeline::insert_archive_records(&self.pool, kind, values, source, &self.config.created_by, self.config.chunk_size)
  }

  // Migración archive -> workbench

  pub fn migrate_archive_to_workbench_compounds(&self,
                                                standardizer: &dyn CompoundStandardizer,
                                                policy: BuildingBlockPolicy,
                                                sources: Option<&[SourceIdentity]>)
                                                -> Result<ChunkSummary, PersistenceError> {
    pipeline::migrate_compounds(&self.pool,
                                standardizer,
                                policy,
                                sources,
                                &self.config.created_by,
                                self.config.chunk_size)
  }

  pub fn migrate_archive_to_workbench_compound_patterns(&self,
                                                        standardizer: &dyn CompoundStandardizer,
                                                        sources: Option<&[SourceIdentity]>)
                                                        -> Result<ChunkSummary, PersistenceError> {
    pipeline::migrate_compound_patterns(&self.pool, standardizer, sources, &self.config.created_by, self.config.chunk_size)
  }

  pub fn migrate_archive_to_workbench_reactions(&self,
                                                standardizer: &dyn ReactionStandardizer,
                                                sources: Option<&[SourceIdentity]>)
                                                -> Result<ChunkSummary, PersistenceError> {
    pipeline::migrate_reactions(&self.pool,
                                ChemicalKind::Reaction,
                                standardizer,
                                sources,
                                &self.config.created_by,
                                self.config.chunk_size)
  }

  pub fn migrate_archive_to_workbench_reaction_patterns(&self,
                                                        standardizer: &dyn ReactionStandardizer,
                                                        sources: Option<&[SourceIdentity]>)
                                                        -> Result<ChunkSummary, PersistenceError> {
    pipeline::migrate_reactions(&self.pool,
                                ChemicalKind::ReactionPattern,
                                standardizer,
                                sources,
                                &self.config.created_by,
                                self.config.chunk_size)
  }

  // Extracción sobre la capa workbench

  pub fn extract_workbench_reaction_transformation_patterns(&self,
                                                            extractor: &dyn ReactionStandardizer,
                                                            sources: Option<&[SourceIdentity]>)
                                                            -> Result<ChunkSummary, PersistenceError> {
    pipeline::extract_transformation_patterns(&self.pool, extractor, sources, &self.config.created_by, self.config.chunk_size)
  }

  pub fn extract_workbench_compound_structure_patterns(&self,
                                                       matcher: &dyn CompoundPatternMatcher,
                                                       sources: Option<&[SourceIdentity]>)
                                                       -> Result<ChunkSummary, PersistenceError> {
    pipeline::extract_structure_patterns(&self.pool, matcher, sources, &self.config.created_by, self.config.chunk_size)
  }

  // Consultas paginadas

  /// Fuentes registradas, por id.
  pub fn list_archive_sources(&self) -> Result<Vec<ArchiveSourceRow>, PersistenceError> {
    use schema::archive_source::dsl as src;
    let mut conn = self.connection()?;
    Ok(src::archive_source.select(ArchiveSourceRow::as_select()).order(src::id.asc()).load(&mut conn)?)
  }

  pub fn select_archive_records(&self, kind: ChemicalKind) -> Result<Chunks<ArchiveEntityRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::archive_query(kind), self.config.chunk_size)
  }

  pub fn select_archive_records_from_sources(&self,
                                             kind: ChemicalKind,
                                             sources: Option<&[SourceIdentity]>)
                                             -> Result<Chunks<ArchiveEntitySourceRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::archive_from_sources_query(kind, sources), self.config.chunk_size)
  }

  pub fn select_workbench_compounds(&self,
                                    is_building_block: Option<bool>)
                                    -> Result<Chunks<WorkbenchCompoundRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::workbench_compounds_query(is_building_block), self.config.chunk_size)
  }

  pub fn select_workbench_compounds_from_sources(&self,
                                                 is_building_block: Option<bool>,
                                                 sources: Option<&[SourceIdentity]>)
                                                 -> Result<Chunks<WorkbenchCompoundSourceRow>, PersistenceError> {
    Chunks::new(self.pool.clone(),
                query::workbench_compounds_from_sources_query(is_building_block, sources),
                self.config.chunk_size)
  }

  pub fn select_workbench_compound_patterns(&self) -> Result<Chunks<WorkbenchEntityRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::workbench_compound_patterns_query(), self.config.chunk_size)
  }

  pub fn select_workbench_compound_patterns_from_sources(&self,
                                                         sources: Option<&[SourceIdentity]>)
                                                         -> Result<Chunks<WorkbenchEntitySourceRow>, PersistenceError> {
    Chunks::new(self.pool.clone(),
                query::workbench_compound_patterns_from_sources_query(sources),
                self.config.chunk_size)
  }

  pub fn select_workbench_reactions(&self, roles: &RoleFilter) -> Result<Chunks<WorkbenchEntityRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::workbench_reactions_query(roles), self.config.chunk_size)
  }

  pub fn select_workbench_reactions_from_sources(&self,
                                                 roles: &RoleFilter,
                                                 sources: Option<&[SourceIdentity]>)
                                                 -> Result<Chunks<WorkbenchEntitySourceRow>, PersistenceError> {
    Chunks::new(self.pool.clone(),
                query::workbench_reactions_from_sources_query(roles, sources),
                self.config.chunk_size)
  }

  pub fn select_workbench_reaction_patterns(&self,
                                            roles: &RoleFilter)
                                            -> Result<Chunks<WorkbenchEntityRow>, PersistenceError> {
    Chunks::new(self.pool.clone(), query::workbench_reaction_patterns_query(roles), self.config.chunk_size)
  }

  pub fn select_workbench_reaction_patterns_from_sources(&self,
                                                         roles: &RoleFilter,
                                                         sources: Option<&[SourceIdentity]>)
                                                         -> Result<Chunks<WorkbenchEntitySourceRow>, PersistenceError> {
    Chunks::new(self.pool.clone(),
                query::workbench_reaction_patterns_from_sources_query(roles, sources),
                self.config.chunk_size)
  }

  // Rutas

  pub fn select_reversed_synthesis_routes(&self,
                                          target: impl Into<CompoundRef>,
                                          max_depth: i64)
                                          -> Result<Vec<RouteNode>, PersistenceError> {
    let mut conn = self.connection()?;
    routes::select_reversed_synthesis_routes(&mut conn, &target.into(), max_depth)
  }

  pub fn reversed_synthesis_route_forest(&self,
                                         target: impl Into<CompoundRef>,
                                         max_depth: i64)
                                         -> Result<RouteForest, PersistenceError> {
    Ok(RouteForest::new(self.select_reversed_synthesis_routes(target, max_depth)?))
  }
}

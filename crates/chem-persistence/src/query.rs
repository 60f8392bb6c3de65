// query.rs
//! Constructor de consultas de lectura y lector paginado.
//!
//! Los constructores devuelven un `SelectQuery` (texto SQL + parámetros) sin
//! ejecutarlo. `Chunks` lo ejecuta por páginas: cuenta una vez y después
//! carga `LIMIT n OFFSET k` en orden ascendente de id, pidiendo una conexión
//! nueva al pool para cada página.
//!
//! Los conjuntos de filtro (fuentes, participantes por rol) viajan como un
//! único parámetro JSON que se expande con `json_each`, así que su tamaño no
//! está limitado por el número máximo de variables de SQLite.
use crate::models::CountRow;
use crate::tables::{archive_source_junction, archive_table, provenance_junction, role_junction, workbench_table};
use crate::{DbPool, PersistenceError};
use chem_domain::{ChemicalKind, Role, SourceIdentity};
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::query_dsl::LoadQuery;
use diesel::sql_types::{BigInt, Bool, Text};
use diesel::sqlite::Sqlite;
use serde_json::Value;
use std::marker::PhantomData;

/// Parámetro posicional de una consulta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
  Text(String),
  Bool(bool),
}

pub(crate) type BoxedQuery<'a> = BoxedSqlQuery<'a, Sqlite, SqlQuery>;

pub(crate) fn bind_values<'a>(mut q: BoxedQuery<'a>, binds: &'a [SqlValue]) -> BoxedQuery<'a> {
  for b in binds {
    q = match b {
      SqlValue::Text(v) => q.bind::<Text, _>(v.as_str()),
      SqlValue::Bool(v) => q.bind::<Bool, _>(*v),
    };
  }
  q
}

/// Consulta de lectura construida pero no ejecutada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
  sql: String,
  binds: Vec<SqlValue>,
  order_by: &'static str,
}

impl SelectQuery {
  pub fn sql(&self) -> &str {
    &self.sql
  }

  pub fn binds(&self) -> &[SqlValue] {
    &self.binds
  }

  pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let sql = format!("SELECT COUNT(*) AS count FROM ({}) AS q", self.sql);
    let q = bind_values(diesel::sql_query(sql).into_boxed::<Sqlite>(), &self.binds);
    let row: CountRow = q.get_result(conn)?;
    Ok(row.count)
  }

  pub fn load_page<T>(&self, conn: &mut SqliteConnection, limit: i64, offset: i64) -> Result<Vec<T>, PersistenceError>
    where for<'a> BoxedQuery<'a>: LoadQuery<'a, SqliteConnection, T>
  {
    let sql = format!("SELECT * FROM ({}) AS q ORDER BY {} LIMIT ? OFFSET ?", self.sql, self.order_by);
    let q = bind_values(diesel::sql_query(sql).into_boxed::<Sqlite>(), &self.binds).bind::<BigInt, _>(limit)
                                                                                   .bind::<BigInt, _>(offset);
    Ok(q.load::<T>(conn)?)
  }
}

/// Filtros de pertenencia por rol para reacciones y patrones de reacción.
///
/// Cada conjunto dado selecciona las reacciones con *algún* participante de
/// ese rol cuya cadena esté en el conjunto; con varios conjuntos el resultado
/// es la intersección. `None` no filtra; un conjunto vacío no deja pasar nada.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
  pub reactants: Option<Vec<String>>,
  pub spectators: Option<Vec<String>>,
  pub products: Option<Vec<String>>,
}

impl RoleFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_reactants<I, S>(mut self, values: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.reactants = Some(values.into_iter().map(Into::into).collect());
    self
  }

  pub fn with_spectators<I, S>(mut self, values: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.spectators = Some(values.into_iter().map(Into::into).collect());
    self
  }

  pub fn with_products<I, S>(mut self, values: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.products = Some(values.into_iter().map(Into::into).collect());
    self
  }

  fn by_role(&self) -> Vec<(Role, &Vec<String>)> {
    let mut out = Vec::new();
    if let Some(v) = &self.reactants {
      out.push((Role::Reactant, v));
    }
    if let Some(v) = &self.spectators {
      out.push((Role::Spectator, v));
    }
    if let Some(v) = &self.products {
      out.push((Role::Product, v));
    }
    out
  }
}

/// Predicado sobre `s.name, s.version, s.file_name`; las tripletas se
/// enlazan como un arreglo JSON de arreglos.
fn source_predicate(sources: &[SourceIdentity], binds: &mut Vec<SqlValue>) -> String {
  if sources.is_empty() {
    return "1 = 0".to_string();
  }
  let triples: Vec<Value> =
    sources.iter().map(|s| Value::from(vec![s.name(), s.version(), s.file_name()])).collect();
  binds.push(SqlValue::Text(Value::from(triples).to_string()));
  "(s.name, s.version, s.file_name) IN (SELECT json_extract(value, '$[0]'), json_extract(value, '$[1]'), \
   json_extract(value, '$[2]') FROM json_each(?))"
    .to_string()
}

fn where_clause(conditions: &[String]) -> String {
  if conditions.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conditions.join(" AND "))
  }
}

const SOURCE_COLUMNS: &str =
  "s.id AS source_id, s.name AS source_name, s.version AS source_version, s.file_name AS source_file_name";

fn archive_columns(kind: ChemicalKind) -> String {
  format!("e.id AS id, e.{} AS canonical, e.created_at AS created_at, e.created_by AS created_by",
          archive_table(kind).column)
}

fn workbench_columns(kind: ChemicalKind) -> String {
  let flag = if kind == ChemicalKind::Compound { ", e.is_building_block AS is_building_block" } else { "" };
  format!("e.id AS id, e.{} AS canonical{}, e.created_at AS created_at, e.created_by AS created_by, \
           e.updated_at AS updated_at, e.updated_by AS updated_by",
          workbench_table(kind).column,
          flag)
}

/// `archive <kind> -> archive_<kind>_source -> archive_source`, con `e` como
/// alias de la entidad archive.
fn archive_source_joins(kind: ChemicalKind) -> String {
  let sj = archive_source_junction(kind);
  format!(" JOIN {t} AS sj ON sj.{l} = e.id JOIN archive_source AS s ON s.id = sj.{r}",
          t = sj.table,
          l = sj.left,
          r = sj.right)
}

/// `workbench <kind> -> provenance -> archive_<kind>_source -> archive_source`,
/// con `e` como alias de la entidad workbench y `pj` de la provenance.
fn workbench_source_joins(kind: ChemicalKind) -> String {
  let pj = provenance_junction(kind);
  let sj = archive_source_junction(kind);
  format!(" JOIN {pt} AS pj ON pj.{pl} = e.id JOIN {st} AS sj ON sj.{sl} = pj.{pr} \
           JOIN archive_source AS s ON s.id = sj.{sr}",
          pt = pj.table,
          pl = pj.left,
          pr = pj.right,
          st = sj.table,
          sl = sj.left,
          sr = sj.right)
}

/// Registros archive de un tipo.
pub fn archive_query(kind: ChemicalKind) -> SelectQuery {
  SelectQuery { sql: format!("SELECT {} FROM {} AS e", archive_columns(kind), archive_table(kind).name),
                binds: Vec::new(),
                order_by: "q.id" }
}

/// Registros archive unidos con su fuente; `sources` restringe a las
/// tripletas dadas.
pub fn archive_from_sources_query(kind: ChemicalKind, sources: Option<&[SourceIdentity]>) -> SelectQuery {
  let mut binds = Vec::new();
  let mut conditions = Vec::new();
  if let Some(sources) = sources {
    conditions.push(source_predicate(sources, &mut binds));
  }
  let sql = format!("SELECT {}, {} FROM {} AS e{}{}",
                    archive_columns(kind),
                    SOURCE_COLUMNS,
                    archive_table(kind).name,
                    archive_source_joins(kind),
                    where_clause(&conditions));
  SelectQuery { sql, binds, order_by: "q.id, q.source_id" }
}

/// Pares distintos `(id, canonical)` de la capa archive, opcionalmente
/// restringidos a ciertas fuentes. Es la entrada de la migración.
pub fn migration_input_query(kind: ChemicalKind, sources: Option<&[SourceIdentity]>) -> SelectQuery {
  let table = archive_table(kind);
  let mut binds = Vec::new();
  let sql = match sources {
    None => format!("SELECT e.id AS id, e.{} AS canonical FROM {} AS e", table.column, table.name),
    Some(sources) => {
      let predicate = source_predicate(sources, &mut binds);
      format!("SELECT DISTINCT e.id AS id, e.{} AS canonical FROM {} AS e{} WHERE {}",
              table.column,
              table.name,
              archive_source_joins(kind),
              predicate)
    }
  };
  SelectQuery { sql, binds, order_by: "q.id" }
}

/// Pares `(id, canonical)` de la capa workbench; entrada de las extracciones.
pub fn workbench_canonical_query(kind: ChemicalKind, sources: Option<&[SourceIdentity]>) -> SelectQuery {
  let table = workbench_table(kind);
  let mut binds = Vec::new();
  let sql = match sources {
    None => format!("SELECT e.id AS id, e.{} AS canonical FROM {} AS e", table.column, table.name),
    Some(sources) => {
      let predicate = source_predicate(sources, &mut binds);
      format!("SELECT DISTINCT e.id AS id, e.{} AS canonical FROM {} AS e{} WHERE {}",
              table.column,
              table.name,
              workbench_source_joins(kind),
              predicate)
    }
  };
  SelectQuery { sql, binds, order_by: "q.id" }
}

fn workbench_conditions(kind: ChemicalKind,
                        is_building_block: Option<bool>,
                        roles: Option<&RoleFilter>,
                        binds: &mut Vec<SqlValue>)
                        -> Vec<String> {
  let mut conditions = Vec::new();
  if let Some(flag) = is_building_block {
    conditions.push("e.is_building_block = ?".to_string());
    binds.push(SqlValue::Bool(flag));
  }
  if let Some(filter) = roles {
    if let Some(c) = role_condition(kind, filter, binds) {
      conditions.push(c);
    }
  }
  conditions
}

/// `e.id IN (<ids con reactivo en S1> INTERSECT <ids con producto en S2> ...)`.
fn role_condition(kind: ChemicalKind, filter: &RoleFilter, binds: &mut Vec<SqlValue>) -> Option<String> {
  let sets = filter.by_role();
  if sets.is_empty() {
    return None;
  }
  if sets.iter().any(|(_, values)| values.is_empty()) {
    return Some("1 = 0".to_string());
  }
  let participant = workbench_table(kind.participant_kind()?);
  let mut subqueries = Vec::with_capacity(sets.len());
  for (role, values) in sets {
    let junction = role_junction(kind, role)?;
    subqueries.push(format!("SELECT j.{l} FROM {t} AS j JOIN {pt} AS p ON p.id = j.{r} \
                             WHERE p.{pc} IN (SELECT value FROM json_each(?))",
                            l = junction.left,
                            t = junction.table,
                            r = junction.right,
                            pt = participant.name,
                            pc = participant.column));
    binds.push(SqlValue::Text(Value::from(values.clone()).to_string()));
  }
  Some(format!("e.id IN ({})", subqueries.join(" INTERSECT ")))
}

fn workbench_query(kind: ChemicalKind, is_building_block: Option<bool>, roles: Option<&RoleFilter>) -> SelectQuery {
  let mut binds = Vec::new();
  let conditions = workbench_conditions(kind, is_building_block, roles, &mut binds);
  let sql = format!("SELECT {} FROM {} AS e{}",
                    workbench_columns(kind),
                    workbench_table(kind).name,
                    where_clause(&conditions));
  SelectQuery { sql, binds, order_by: "q.id" }
}

fn workbench_from_sources_query(kind: ChemicalKind,
                                is_building_block: Option<bool>,
                                roles: Option<&RoleFilter>,
                                sources: Option<&[SourceIdentity]>)
                                -> SelectQuery {
  let mut binds = Vec::new();
  let mut conditions = workbench_conditions(kind, is_building_block, roles, &mut binds);
  if let Some(sources) = sources {
    conditions.push(source_predicate(sources, &mut binds));
  }
  let sql = format!("SELECT {}, pj.{} AS archive_id, {} FROM {} AS e{}{}",
                    workbench_columns(kind),
                    provenance_junction(kind).right,
                    SOURCE_COLUMNS,
                    workbench_table(kind).name,
                    workbench_source_joins(kind),
                    where_clause(&conditions));
  SelectQuery { sql, binds, order_by: "q.id, q.archive_id, q.source_id" }
}

pub fn workbench_compounds_query(is_building_block: Option<bool>) -> SelectQuery {
  workbench_query(ChemicalKind::Compound, is_building_block, None)
}

pub fn workbench_compounds_from_sources_query(is_building_block: Option<bool>,
                                              sources: Option<&[SourceIdentity]>)
                                              -> SelectQuery {
  workbench_from_sources_query(ChemicalKind::Compound, is_building_block, None, sources)
}

pub fn workbench_compound_patterns_query() -> SelectQuery {
  workbench_query(ChemicalKind::CompoundPattern, None, None)
}

pub fn workbench_compound_patterns_from_sources_query(sources: Option<&[SourceIdentity]>) -> SelectQuery {
  workbench_from_sources_query(ChemicalKind::CompoundPattern, None, None, sources)
}

pub fn workbench_reactions_query(roles: &RoleFilter) -> SelectQuery {
  workbench_query(ChemicalKind::Reaction, None, Some(roles))
}

pub fn workbench_reactions_from_sources_query(roles: &RoleFilter, sources: Option<&[SourceIdentity]>) -> SelectQuery {
  workbench_from_sources_query(ChemicalKind::Reaction, None, Some(roles), sources)
}

pub fn workbench_reaction_patterns_query(roles: &RoleFilter) -> SelectQuery {
  workbench_query(ChemicalKind::ReactionPattern, None, Some(roles))
}

pub fn workbench_reaction_patterns_from_sources_query(roles: &RoleFilter,
                                                      sources: Option<&[SourceIdentity]>)
                                                      -> SelectQuery {
  workbench_from_sources_query(ChemicalKind::ReactionPattern, None, Some(roles), sources)
}

/// Secuencia perezosa, finita y no reiniciable de páginas de una consulta.
pub struct Chunks<T> {
  pool: DbPool,
  query: SelectQuery,
  chunk_size: i64,
  total: i64,
  offset: i64,
  done: bool,
  _row: PhantomData<fn() -> T>,
}

impl<T> Chunks<T> where for<'a> BoxedQuery<'a>: LoadQuery<'a, SqliteConnection, T>
{
  /// Cuenta las filas una sola vez; cada página se carga después con su
  /// propia conexión.
  pub fn new(pool: DbPool, query: SelectQuery, chunk_size: usize) -> Result<Self, PersistenceError> {
    if chunk_size == 0 {
      return Err(PersistenceError::Validation("el tamaño de lote debe ser mayor que cero".to_string()));
    }
    let total = Self::count_rows(&pool, &query).map_err(|e| {
                                                  log::error!("paged query could not be counted: {}", e);
                                                  e
                                                })?;
    Ok(Self { pool, query, chunk_size: chunk_size as i64, total, offset: 0, done: false, _row: PhantomData })
  }

  fn count_rows(pool: &DbPool, query: &SelectQuery) -> Result<i64, PersistenceError> {
    let mut conn = pool.get()?;
    query.count(&mut conn)
  }

  pub fn total(&self) -> i64 {
    self.total
  }

  /// Número de páginas según el conteo inicial.
  pub fn chunk_count(&self) -> usize {
    ((self.total + self.chunk_size - 1) / self.chunk_size) as usize
  }

  pub fn query(&self) -> &SelectQuery {
    &self.query
  }

  fn load_next(&mut self) -> Result<Vec<T>, PersistenceError> {
    let mut conn = self.pool.get()?;
    self.query.load_page::<T>(&mut conn, self.chunk_size, self.offset)
  }
}

impl<T> Iterator for Chunks<T> where for<'a> BoxedQuery<'a>: LoadQuery<'a, SqliteConnection, T>
{
  type Item = Result<Vec<T>, PersistenceError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done || self.offset >= self.total {
      return None;
    }
    let page = self.load_next();
    self.offset += self.chunk_size;
    match page {
      Ok(rows) if rows.is_empty() => {
        self.done = true;
        None
      }
      Ok(rows) => Some(Ok(rows)),
      Err(e) => {
        log::error!("page at offset {} could not be loaded: {}", self.offset - self.chunk_size, e);
        self.done = true;
        Some(Err(e))
      }
    }
  }
}

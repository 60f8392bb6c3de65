// upsert.rs
//! Motor de deduplicación: inserta ignorando conflictos sobre la columna
//! canónica única y luego resuelve el mapa `cadena -> id` del lote completo.
//!
//! Sólo se absorben los conflictos de unicidad (`ON CONFLICT DO NOTHING`);
//! cualquier otro fallo (NOT NULL, FK, CHECK) se propaga y aborta la
//! transacción que envuelve al lote.
use crate::models::{CanonicalRow, NewArchiveSource};
use crate::schema;
use crate::tables::EntityTable;
use crate::PersistenceError;
use chem_domain::SourceIdentity;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text, Timestamp};
use diesel::sqlite::Sqlite;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Filas por sentencia INSERT; mantiene los parámetros por debajo del límite
/// de SQLite (999 en compilaciones antiguas).
pub(crate) const INSERT_BATCH: usize = 150;
/// Cadenas por lista `IN (...)`.
pub(crate) const SELECT_BATCH: usize = 500;

pub(crate) fn now() -> NaiveDateTime {
  Utc::now().naive_utc()
}

pub(crate) fn placeholders(n: usize, group: &str) -> String {
  vec![group; n].join(", ")
}

/// Inserta las cadenas que falten en `table` y devuelve el id de cada una.
/// Idempotente: repetir el mismo lote no crea filas y devuelve el mismo mapa.
pub fn resolve_ids(conn: &mut SqliteConnection,
                   table: EntityTable,
                   canonical: &[String],
                   created_by: &str)
                   -> Result<HashMap<String, i64>, PersistenceError> {
  let unique: IndexSet<&str> = canonical.iter().map(String::as_str).collect();
  if unique.is_empty() {
    return Ok(HashMap::new());
  }
  let values: Vec<&str> = unique.into_iter().collect();
  let ts = now();
  for batch in values.chunks(INSERT_BATCH) {
    let sql = format!("INSERT INTO {} ({}, created_at, created_by) VALUES {} ON CONFLICT DO NOTHING",
                      table.name,
                      table.column,
                      placeholders(batch.len(), "(?, ?, ?)"));
    let mut q = diesel::sql_query(sql).into_boxed::<Sqlite>();
    for v in batch {
      q = q.bind::<Text, _>(*v).bind::<Timestamp, _>(ts).bind::<Text, _>(created_by);
    }
    q.execute(conn)?;
  }
  select_ids(conn, table, &values)
}

/// Mapa `cadena -> id` de las cadenas existentes en `table`.
pub fn select_ids(conn: &mut SqliteConnection,
                  table: EntityTable,
                  values: &[&str])
                  -> Result<HashMap<String, i64>, PersistenceError> {
  let mut out = HashMap::with_capacity(values.len());
  for batch in values.chunks(SELECT_BATCH) {
    let sql = format!("SELECT id, {col} AS canonical FROM {tbl} WHERE {col} IN ({})",
                      placeholders(batch.len(), "?"),
                      col = table.column,
                      tbl = table.name);
    let mut q = diesel::sql_query(sql).into_boxed::<Sqlite>();
    for v in batch {
      q = q.bind::<Text, _>(*v);
    }
    let rows: Vec<CanonicalRow> = q.load(conn)?;
    out.extend(rows.into_iter().map(|r| (r.canonical, r.id)));
  }
  Ok(out)
}

/// Upsert de `workbench_compound` con bandera de building block.
///
/// Las filas nuevas se crean con la bandera dada. En las existentes la
/// bandera (y `updated_at`/`updated_by`) sólo se escribe cuando el valor
/// almacenado difiere. Si una cadena aparece varias veces en el lote gana el
/// último valor.
pub fn resolve_compound_ids_with_flags(conn: &mut SqliteConnection,
                                       records: &[(String, bool)],
                                       created_by: &str)
                                       -> Result<HashMap<String, i64>, PersistenceError> {
  use schema::workbench_compound::dsl as wc;
  let mut flags: IndexMap<&str, bool> = IndexMap::with_capacity(records.len());
  for (smiles, flag) in records {
    flags.insert(smiles.as_str(), *flag);
  }
  if flags.is_empty() {
    return Ok(HashMap::new());
  }
  let ts = now();
  let entries: Vec<(&str, bool)> = flags.iter().map(|(s, f)| (*s, *f)).collect();
  for batch in entries.chunks(INSERT_BATCH) {
    let sql = format!("INSERT INTO workbench_compound (smiles, is_building_block, created_at, created_by) VALUES {} \
                       ON CONFLICT DO NOTHING",
                      placeholders(batch.len(), "(?, ?, ?, ?)"));
    let mut q = diesel::sql_query(sql).into_boxed::<Sqlite>();
    for (smiles, flag) in batch {
      q = q.bind::<Text, _>(*smiles).bind::<Bool, _>(*flag).bind::<Timestamp, _>(ts).bind::<Text, _>(created_by);
    }
    q.execute(conn)?;
  }
  for flag in [true, false] {
    let group: Vec<&str> = entries.iter().filter(|(_, f)| *f == flag).map(|(s, _)| *s).collect();
    for batch in group.chunks(SELECT_BATCH) {
      let changed = diesel::update(wc::workbench_compound.filter(wc::smiles.eq_any(batch.to_vec()))
                                                         .filter(wc::is_building_block.ne(flag)))
        .set((wc::is_building_block.eq(flag), wc::updated_at.eq(Some(ts)), wc::updated_by.eq(Some(created_by))))
        .execute(conn)?;
      if changed > 0 {
        log::debug!("is_building_block set to {} on {} compounds", flag, changed);
      }
    }
  }
  let values: Vec<&str> = flags.keys().copied().collect();
  select_ids(conn, crate::tables::workbench_table(chem_domain::ChemicalKind::Compound), &values)
}

/// Resuelve (creándola si hace falta) la fuente `(name, version, file_name)`.
pub fn resolve_archive_source(conn: &mut SqliteConnection,
                              source: &SourceIdentity,
                              created_by: &str)
                              -> Result<i64, PersistenceError> {
  use schema::archive_source::dsl as src;
  let row = NewArchiveSource { name: source.name(),
                               version: source.version(),
                               file_name: source.file_name(),
                               created_at: now(),
                               created_by };
  diesel::insert_into(src::archive_source).values(&row).on_conflict_do_nothing().execute(conn)?;
  let id = src::archive_source.filter(src::name.eq(source.name()))
                              .filter(src::version.eq(source.version()))
                              .filter(src::file_name.eq(source.file_name()))
                              .select(src::id)
                              .first::<i64>(conn)?;
  Ok(id)
}

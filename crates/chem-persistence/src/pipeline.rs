// pipeline.rs
//! Ingesta a la capa archive y migración/extracción hacia la capa workbench.
//!
//! Todo se procesa por lotes secuenciales. Cada lote con algo que escribir
//! usa una conexión recién pedida al pool y una sola transacción (que Diesel
//! convierte en savepoint si ya hay una abierta). Si un lote falla se revierte
//! sólo ese lote, los anteriores quedan confirmados y el error se propaga.
use crate::linker::{insert_links, link_provenance};
use crate::models::CanonicalRow;
use crate::query::{migration_input_query, workbench_canonical_query, Chunks, SelectQuery};
use crate::tables::{archive_source_junction, archive_table, provenance_junction, role_junction, workbench_table,
                    STRUCTURE_PATTERN, TRANSFORMATION_PATTERN};
use crate::upsert::{resolve_archive_source, resolve_compound_ids_with_flags, resolve_ids};
use crate::{DbConn, DbPool, PersistenceError};
use chem_domain::{BuildingBlockPolicy, ChemicalKind, CompoundPatternMatcher, CompoundStandardizer,
                  ReactionStandardizer, Role, SourceIdentity, StandardizedReaction};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Resumen de una ejecución por lotes.
///
/// `rows_written` cuenta las filas nuevas en tablas de unión (fuente,
/// provenance, roles y patrones); las entidades deduplicadas no se cuentan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
  pub chunks_total: usize,
  pub chunks_committed: usize,
  pub chunks_skipped: usize,
  pub records_read: usize,
  pub records_rejected: usize,
  pub rows_written: usize,
}

fn log_failure(label: &str, chunk: usize, e: PersistenceError) -> PersistenceError {
  log::error!("{}: chunk {} failed and was rolled back: {}", label, chunk, e);
  e
}

fn checkout(pool: &DbPool, label: &str) -> Result<DbConn, PersistenceError> {
  pool.get().map_err(|e| {
              log::error!("{}: no connection available: {}", label, e);
              e.into()
            })
}

/// Inserta cadenas crudas en la capa archive y las enlaza con su fuente.
pub fn insert_archive_records(pool: &DbPool,
                              kind: ChemicalKind,
                              values: &[String],
                              source: &SourceIdentity,
                              created_by: &str,
                              chunk_size: usize)
                              -> Result<ChunkSummary, PersistenceError> {
  if chunk_size == 0 {
    return Err(PersistenceError::Validation("el tamaño de lote debe ser mayor que cero".to_string()));
  }
  let label = format!("archive {}", kind);
  let source_id = {
    let mut conn = checkout(pool, &label)?;
    conn.transaction::<_, PersistenceError, _>(|c| resolve_archive_source(c, source, created_by))
        .map_err(|e| {
          log::error!("{}: could not register source {}: {}", label, source, e);
          e
        })?
  };
  let mut summary = ChunkSummary { chunks_total: values.len().div_ceil(chunk_size), ..ChunkSummary::default() };
  log::info!("inserting {} {} from {} in {} chunks", values.len(), label, source, summary.chunks_total);
  let table = archive_table(kind);
  let junction = archive_source_junction(kind);
  for (idx, chunk) in values.chunks(chunk_size).enumerate() {
    summary.records_read += chunk.len();
    let mut conn = checkout(pool, &label)?;
    let written = conn.transaction::<_, PersistenceError, _>(|c| {
                        let ids = resolve_ids(c, table, chunk, created_by)?;
                        let links: Vec<(i64, i64)> = ids.values().map(|id| (*id, source_id)).collect();
                        insert_links(c, junction, &links)
                      })
                      .map_err(|e| log_failure(&label, idx, e))?;
    summary.chunks_committed += 1;
    summary.rows_written += written;
    log::debug!("{}: chunk {} committed ({} new source links)", label, idx, written);
  }
  log::info!("{} done: {:?}", label, summary);
  Ok(summary)
}

/// Recorre `input` por lotes. `prepare` transforma un lote leído en elementos
/// a escribir (y cuenta los rechazados); `write` los escribe dentro de la
/// transacción del lote.
fn run_chunks<E>(pool: &DbPool,
                 label: &str,
                 input: SelectQuery,
                 chunk_size: usize,
                 mut prepare: impl FnMut(&[CanonicalRow]) -> Result<(Vec<E>, usize), PersistenceError>,
                 mut write: impl FnMut(&mut SqliteConnection, &[E]) -> Result<usize, PersistenceError>)
                 -> Result<ChunkSummary, PersistenceError> {
  let chunks: Chunks<CanonicalRow> = Chunks::new(pool.clone(), input, chunk_size).map_err(|e| {
                                       log::error!("{}: could not read input: {}", label, e);
                                       e
                                     })?;
  let mut summary = ChunkSummary { chunks_total: chunks.chunk_count(), ..ChunkSummary::default() };
  log::info!("{}: {} records in {} chunks", label, chunks.total(), summary.chunks_total);
  for (idx, page) in chunks.enumerate() {
    let rows = page.map_err(|e| log_failure(label, idx, e))?;
    summary.records_read += rows.len();
    let (items, rejected) = prepare(&rows).map_err(|e| log_failure(label, idx, e))?;
    summary.records_rejected += rejected;
    if items.is_empty() {
      log::warn!("{}: chunk {} has nothing to write, skipped", label, idx);
      summary.chunks_skipped += 1;
      continue;
    }
    let mut conn = checkout(pool, label)?;
    let written = conn.transaction::<_, PersistenceError, _>(|c| write(c, &items))
                      .map_err(|e| log_failure(label, idx, e))?;
    summary.chunks_committed += 1;
    summary.rows_written += written;
    log::debug!("{}: chunk {} committed ({} records, {} rejected, {} rows)", label, idx, rows.len(), rejected, written);
  }
  log::info!("{} done: {:?}", label, summary);
  Ok(summary)
}

/// Verifica que la estrategia devolvió un resultado por entrada. Los `None`
/// se descartan con un aviso; el resto se aplana junto al id de origen.
fn flatten_results<R, E>(label: &str,
                         rows: &[CanonicalRow],
                         results: Vec<Option<R>>,
                         mut expand: impl FnMut(i64, R, &mut Vec<E>))
                         -> Result<(Vec<E>, usize), PersistenceError> {
  if results.len() != rows.len() {
    return Err(PersistenceError::Validation(format!("{}: la estrategia devolvió {} resultados para {} entradas",
                                                    label,
                                                    results.len(),
                                                    rows.len())));
  }
  let mut items = Vec::with_capacity(rows.len());
  let mut rejected = 0;
  for (row, result) in rows.iter().zip(results) {
    match result {
      Some(r) => expand(row.id, r, &mut items),
      None => {
        rejected += 1;
        log::warn!("{}: record {} ('{}') rejected", label, row.id, row.canonical);
      }
    }
  }
  Ok((items, rejected))
}

fn canonical_strings(rows: &[CanonicalRow]) -> Vec<String> {
  rows.iter().map(|r| r.canonical.clone()).collect()
}

/// Migra compuestos archive a `workbench_compound` aplicando la política de
/// building block sobre la cadena estandarizada.
pub fn migrate_compounds(pool: &DbPool,
                         standardizer: &dyn CompoundStandardizer,
                         policy: BuildingBlockPolicy,
                         sources: Option<&[SourceIdentity]>,
                         created_by: &str,
                         chunk_size: usize)
                         -> Result<ChunkSummary, PersistenceError> {
  let label = format!("migrate {}", ChemicalKind::Compound);
  let input = migration_input_query(ChemicalKind::Compound, sources);
  run_chunks(pool,
             &label,
             input,
             chunk_size,
             |rows| {
               let results = standardizer.standardize(&canonical_strings(rows));
               flatten_results(&label, rows, results, |id, smiles: String, out| {
                 let flag = policy.flag_for(&smiles);
                 out.push((id, smiles, flag));
               })
             },
             |c, items| write_compounds(c, items, created_by))
}

fn write_compounds(conn: &mut SqliteConnection,
                   items: &[(i64, String, Option<bool>)],
                   created_by: &str)
                   -> Result<usize, PersistenceError> {
  let flagged: Vec<(String, bool)> =
    items.iter().filter_map(|(_, smiles, flag)| flag.map(|f| (smiles.clone(), f))).collect();
  let unflagged: Vec<String> =
    items.iter().filter(|(_, _, flag)| flag.is_none()).map(|(_, smiles, _)| smiles.clone()).collect();
  let mut ids: HashMap<String, i64> = resolve_ids(conn, workbench_table(ChemicalKind::Compound), &unflagged, created_by)?;
  ids.extend(resolve_compound_ids_with_flags(conn, &flagged, created_by)?);
  let pairs: Vec<(i64, String)> = items.iter().map(|(id, smiles, _)| (*id, smiles.clone())).collect();
  link_provenance(conn, provenance_junction(ChemicalKind::Compound), &pairs, &ids)
}

/// Migra patrones de compuesto archive a `workbench_compound_pattern`.
pub fn migrate_compound_patterns(pool: &DbPool,
                                 standardizer: &dyn CompoundStandardizer,
                                 sources: Option<&[SourceIdentity]>,
                                 created_by: &str,
                                 chunk_size: usize)
                                 -> Result<ChunkSummary, PersistenceError> {
  let kind = ChemicalKind::CompoundPattern;
  let label = format!("migrate {}", kind);
  run_chunks(pool,
             &label,
             migration_input_query(kind, sources),
             chunk_size,
             |rows| {
               let results = standardizer.standardize(&canonical_strings(rows));
               flatten_results(&label, rows, results, |id, smarts: String, out| out.push((id, smarts)))
             },
             |c, items: &[(i64, String)]| {
               let values: Vec<String> = items.iter().map(|(_, s)| s.clone()).collect();
               let ids = resolve_ids(c, workbench_table(kind), &values, created_by)?;
               link_provenance(c, provenance_junction(kind), items, &ids)
             })
}

/// Migra reacciones (o patrones de reacción) con sus participantes por rol.
/// Una reacción archive puede producir varias reacciones workbench.
pub fn migrate_reactions(pool: &DbPool,
                         kind: ChemicalKind,
                         standardizer: &dyn ReactionStandardizer,
                         sources: Option<&[SourceIdentity]>,
                         created_by: &str,
                         chunk_size: usize)
                         -> Result<ChunkSummary, PersistenceError> {
  if !kind.has_roles() {
    return Err(PersistenceError::Validation(format!("{} no tienen participantes por rol", kind)));
  }
  let label = format!("migrate {}", kind);
  run_chunks(pool,
             &label,
             migration_input_query(kind, sources),
             chunk_size,
             |rows| {
               let results = standardizer.standardize(&canonical_strings(rows));
               flatten_results(&label, rows, results, expand_reactions)
             },
             |c, items: &[(i64, StandardizedReaction)]| {
               write_reactions(c, kind, items, created_by, |c, ids| {
                 let pairs: Vec<(i64, String)> = items.iter().map(|(id, r)| (*id, r.canonical.clone())).collect();
                 link_provenance(c, provenance_junction(kind), &pairs, ids)
               })
             })
}

fn expand_reactions(id: i64, reactions: Vec<StandardizedReaction>, out: &mut Vec<(i64, StandardizedReaction)>) {
  out.extend(reactions.into_iter().map(|r| (id, r)));
}

/// Escribe un lote de reacciones en el orden: ids de reacción, enlace de
/// origen (`link`), ids de participantes y uniones por rol.
fn write_reactions(conn: &mut SqliteConnection,
                   kind: ChemicalKind,
                   items: &[(i64, StandardizedReaction)],
                   created_by: &str,
                   link: impl FnOnce(&mut SqliteConnection, &HashMap<String, i64>) -> Result<usize, PersistenceError>)
                   -> Result<usize, PersistenceError> {
  let participant_kind = kind.participant_kind()
                             .ok_or_else(|| PersistenceError::Validation(format!("{} no tienen participantes", kind)))?;
  let canonical: Vec<String> = items.iter().map(|(_, r)| r.canonical.clone()).collect();
  let reaction_ids = resolve_ids(conn, workbench_table(kind), &canonical, created_by)?;
  let mut written = link(conn, &reaction_ids)?;

  let participants: Vec<String> = items.iter().flat_map(|(_, r)| r.participants().cloned()).collect();
  let participant_ids = resolve_ids(conn, workbench_table(participant_kind), &participants, created_by)?;

  for role in Role::ALL {
    let junction = role_junction(kind, role).ok_or_else(|| {
                                                PersistenceError::Validation(format!("{} sin rol {}", kind, role.as_str()))
                                              })?;
    let mut pairs = Vec::new();
    for (_, reaction) in items {
      let members = match role {
        Role::Reactant => &reaction.reactants,
        Role::Spectator => &reaction.spectators,
        Role::Product => &reaction.products,
      };
      let reaction_id = lookup(&reaction_ids, &reaction.canonical, kind)?;
      for member in members {
        pairs.push((reaction_id, lookup(&participant_ids, member, participant_kind)?));
      }
    }
    written += insert_links(conn, junction, &pairs)?;
  }
  Ok(written)
}

fn lookup(ids: &HashMap<String, i64>, canonical: &str, kind: ChemicalKind) -> Result<i64, PersistenceError> {
  ids.get(canonical)
     .copied()
     .ok_or_else(|| PersistenceError::Validation(format!("{}: sin id para '{}'", kind, canonical)))
}

/// Extrae patrones de transformación de las reacciones workbench. Escribe
/// los patrones de reacción, sus participantes por rol y la unión
/// `workbench_reaction_transformation_pattern`.
pub fn extract_transformation_patterns(pool: &DbPool,
                                       extractor: &dyn ReactionStandardizer,
                                       sources: Option<&[SourceIdentity]>,
                                       created_by: &str,
                                       chunk_size: usize)
                                       -> Result<ChunkSummary, PersistenceError> {
  let label = "extract transformation patterns";
  run_chunks(pool,
             label,
             workbench_canonical_query(ChemicalKind::Reaction, sources),
             chunk_size,
             |rows| {
               let results = extractor.standardize(&canonical_strings(rows));
               flatten_results(label, rows, results, expand_reactions)
             },
             |c, items: &[(i64, StandardizedReaction)]| {
               write_reactions(c, ChemicalKind::ReactionPattern, items, created_by, |c, ids| {
                 let mut pairs = Vec::with_capacity(items.len());
                 for (reaction_id, pattern) in items {
                   pairs.push((*reaction_id, lookup(ids, &pattern.canonical, ChemicalKind::ReactionPattern)?));
                 }
                 insert_links(c, TRANSFORMATION_PATTERN, &pairs)
               })
             })
}

/// Asocia compuestos workbench con los patrones de estructura que contienen.
pub fn extract_structure_patterns(pool: &DbPool,
                                  matcher: &dyn CompoundPatternMatcher,
                                  sources: Option<&[SourceIdentity]>,
                                  created_by: &str,
                                  chunk_size: usize)
                                  -> Result<ChunkSummary, PersistenceError> {
  let label = "extract structure patterns";
  run_chunks(pool,
             label,
             workbench_canonical_query(ChemicalKind::Compound, sources),
             chunk_size,
             |rows| {
               let results = matcher.match_patterns(&canonical_strings(rows));
               flatten_results(label, rows, results, |id, patterns: Vec<String>, out| {
                 out.extend(patterns.into_iter().map(|p| (id, p)))
               })
             },
             |c, items: &[(i64, String)]| {
               let values: Vec<String> = items.iter().map(|(_, p)| p.clone()).collect();
               let ids = resolve_ids(c, workbench_table(ChemicalKind::CompoundPattern), &values, created_by)?;
               let mut pairs = Vec::with_capacity(items.len());
               for (compound_id, pattern) in items {
                 pairs.push((*compound_id, lookup(&ids, pattern, ChemicalKind::CompoundPattern)?));
               }
               insert_links(c, STRUCTURE_PATTERN, &pairs)
             })
}

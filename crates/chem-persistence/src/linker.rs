// linker.rs
use crate::tables::Junction;
use crate::upsert::{placeholders, INSERT_BATCH};
use crate::PersistenceError;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Inserta filas `(left, right)` en una tabla de unión. Los pares repetidos
/// (en la entrada o ya almacenados) no hacen nada. Devuelve las filas nuevas.
pub fn insert_links(conn: &mut SqliteConnection,
                    junction: Junction,
                    pairs: &[(i64, i64)])
                    -> Result<usize, PersistenceError> {
  let unique: IndexSet<(i64, i64)> = pairs.iter().copied().collect();
  if unique.is_empty() {
    return Ok(0);
  }
  let values: Vec<(i64, i64)> = unique.into_iter().collect();
  let mut written = 0;
  for batch in values.chunks(INSERT_BATCH) {
    let sql = format!("INSERT INTO {} ({}, {}) VALUES {} ON CONFLICT DO NOTHING",
                      junction.table,
                      junction.left,
                      junction.right,
                      placeholders(batch.len(), "(?, ?)"));
    let mut q = diesel::sql_query(sql).into_boxed::<Sqlite>();
    for (left, right) in batch {
      q = q.bind::<BigInt, _>(*left).bind::<BigInt, _>(*right);
    }
    written += q.execute(conn)?;
  }
  Ok(written)
}

/// Enlaza cada entidad workbench con el registro archive del que salió.
///
/// `pairs` son `(archive_id, cadena canónica workbench)`; un mismo
/// `archive_id` puede aparecer con varias cadenas. Una cadena que no esté en
/// `ids` indica un error de programación en el llamador y aborta el lote.
pub fn link_provenance(conn: &mut SqliteConnection,
                       junction: Junction,
                       pairs: &[(i64, String)],
                       ids: &HashMap<String, i64>)
                       -> Result<usize, PersistenceError> {
  let mut links = Vec::with_capacity(pairs.len());
  for (archive_id, canonical) in pairs {
    let workbench_id = ids.get(canonical).ok_or_else(|| {
                                            PersistenceError::Validation(format!("{}: sin id para '{}' (archive {})",
                                                                                 junction.table, canonical, archive_id))
                                          })?;
    links.push((*workbench_id, *archive_id));
  }
  insert_links(conn, junction, &links)
}

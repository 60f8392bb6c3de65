// routes.rs
//! Reconstrucción de rutas de síntesis invertidas con una CTE recursiva.
//!
//! Cada fila es un compuesto alcanzado por una rama concreta. Desde el
//! objetivo se baja por las reacciones que lo producen hacia sus reactivos.
//! Un nodo no se expande si es building block, si su id ya aparece en la
//! rama (`path`) o si al expandirlo se superaría `max_depth`; en esos casos
//! no se buscan reacciones productoras y el nodo queda como terminal.
use crate::PersistenceError;
use chem_domain::{CompoundRef, RouteNode};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable, Text};
use diesel::sqlite::Sqlite;

#[derive(Debug, QueryableByName)]
struct RouteRow {
  #[diesel(sql_type = Text)]
  path: String,
  #[diesel(sql_type = BigInt)]
  depth: i64,
  #[diesel(sql_type = Bool)]
  expand: bool,
  #[diesel(sql_type = BigInt)]
  compound_id: i64,
  #[diesel(sql_type = Text)]
  compound_smiles: String,
  #[diesel(sql_type = Bool)]
  is_building_block: bool,
  #[diesel(sql_type = Nullable<BigInt>)]
  prior_reaction_id: Option<i64>,
  #[diesel(sql_type = Nullable<BigInt>)]
  posterior_reaction_id: Option<i64>,
  #[diesel(sql_type = Nullable<Text>)]
  posterior_reaction_smiles: Option<String>,
  #[diesel(sql_type = Bool)]
  is_dead_end: bool,
}

impl From<RouteRow> for RouteNode {
  fn from(r: RouteRow) -> Self {
    RouteNode { path: r.path,
                depth: r.depth,
                expand: r.expand,
                compound_id: r.compound_id,
                compound_smiles: r.compound_smiles,
                is_building_block: r.is_building_block,
                prior_reaction_id: r.prior_reaction_id,
                posterior_reaction_id: r.posterior_reaction_id,
                posterior_reaction_smiles: r.posterior_reaction_smiles,
                is_dead_end: r.is_dead_end }
  }
}

// ?1 = max_depth, ?2 = objetivo.
const STEP_EXPAND: &str = "(NOT wc.is_building_block \
                           AND instr('->' || r.path || '->', '->' || CAST(wc.id AS TEXT) || '->') = 0 \
                           AND r.depth + 1 < ?1)";

fn route_sql(target_column: &str) -> String {
  format!("WITH RECURSIVE route (path, depth, expand, compound_id, compound_smiles, is_building_block, \
                                 prior_reaction_id, posterior_reaction_id, posterior_reaction_smiles) AS ( \
             SELECT CAST(wc.id AS TEXT), 0, (NOT wc.is_building_block AND 0 < ?1), \
                    wc.id, wc.smiles, wc.is_building_block, NULL, wr.id, wr.smiles \
             FROM workbench_compound AS wc \
             LEFT JOIN workbench_reaction_product_compound AS pc \
               ON pc.workbench_compound_id = wc.id AND NOT wc.is_building_block AND 0 < ?1 \
             LEFT JOIN workbench_reaction AS wr ON wr.id = pc.workbench_reaction_id \
             WHERE wc.{target} = ?2 \
             UNION ALL \
             SELECT r.path || '->' || CAST(wc.id AS TEXT), r.depth + 1, {expand}, \
                    wc.id, wc.smiles, wc.is_building_block, r.posterior_reaction_id, wr.id, wr.smiles \
             FROM route AS r \
             JOIN workbench_reaction_reactant_compound AS rc ON rc.workbench_reaction_id = r.posterior_reaction_id \
             JOIN workbench_compound AS wc ON wc.id = rc.workbench_compound_id \
             LEFT JOIN workbench_reaction_product_compound AS pc \
               ON pc.workbench_compound_id = wc.id AND {expand} \
             LEFT JOIN workbench_reaction AS wr ON wr.id = pc.workbench_reaction_id \
             WHERE r.expand AND r.depth < ?1 \
           ) \
           SELECT path, depth, expand, compound_id, compound_smiles, is_building_block, prior_reaction_id, \
                  posterior_reaction_id, posterior_reaction_smiles, \
                  (posterior_reaction_id IS NULL OR NOT expand) AS is_dead_end \
           FROM route \
           ORDER BY depth, prior_reaction_id, compound_id, posterior_reaction_id, path",
          target = target_column,
          expand = STEP_EXPAND)
}

/// Rutas de síntesis invertidas de `target` hasta `max_depth` niveles.
///
/// Un objetivo inexistente devuelve un vector vacío; uno sin reacciones
/// productoras devuelve una sola fila terminal.
pub fn select_reversed_synthesis_routes(conn: &mut SqliteConnection,
                                        target: &CompoundRef,
                                        max_depth: i64)
                                        -> Result<Vec<RouteNode>, PersistenceError> {
  if max_depth < 0 {
    return Err(PersistenceError::Validation(format!("max_depth no puede ser negativo: {}", max_depth)));
  }
  let q = match target {
    CompoundRef::Id(id) => {
      diesel::sql_query(route_sql("id")).into_boxed::<Sqlite>().bind::<BigInt, _>(max_depth).bind::<BigInt, _>(*id)
    }
    CompoundRef::Smiles(smiles) => diesel::sql_query(route_sql("smiles")).into_boxed::<Sqlite>()
                                                                         .bind::<BigInt, _>(max_depth)
                                                                         .bind::<Text, _>(smiles.as_str()),
  };
  let rows: Vec<RouteRow> = q.load(conn).map_err(|e| {
                                          log::error!("route query for {} failed: {}", target, e);
                                          e
                                        })?;
  log::debug!("route query for {} (max depth {}) returned {} rows", target, max_depth, rows.len());
  Ok(rows.into_iter().map(RouteNode::from).collect())
}

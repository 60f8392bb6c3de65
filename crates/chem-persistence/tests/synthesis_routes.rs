use chem_domain::{BuildingBlockPolicy, RouteNode, SourceIdentity, StandardizedReaction};
use chem_persistence::{DieselChemRepository, PersistenceError, StoreConfig};
use std::path::PathBuf;
use uuid::Uuid;

fn open_repo() -> (DieselChemRepository, PathBuf) {
  let tmp_path = std::env::temp_dir().join(format!("chemroute_test_{}.db", Uuid::new_v4()));
  let cfg = StoreConfig { chunk_size: 50, pool_size: 2, ..StoreConfig::for_file(tmp_path.to_str().expect("utf8 path")) };
  let repo = DieselChemRepository::open(&cfg).expect("failed to open repo");
  (repo, tmp_path)
}

fn cleanup(path: PathBuf) {
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
  }
}

fn strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|s| s.to_string()).collect()
}

fn split_reaction(smiles: &str) -> Option<StandardizedReaction> {
  let parts: Vec<&str> = smiles.split('>').collect();
  if parts.len() != 3 {
    return None;
  }
  let side = |s: &str| -> Vec<String> { s.split('.').filter(|p| !p.is_empty()).map(|p| p.to_string()).collect() };
  Some(StandardizedReaction::new(smiles, side(parts[0]), side(parts[1]), side(parts[2])))
}

fn reactions(inputs: &[String]) -> Vec<Option<Vec<StandardizedReaction>>> {
  inputs.iter().map(|s| split_reaction(s).map(|r| vec![r])).collect()
}

fn identity(inputs: &[String]) -> Vec<Option<String>> {
  inputs.iter().map(|s| Some(s.clone())).collect()
}

/// Carga `building_blocks` marcados y después las reacciones.
fn seed(repo: &DieselChemRepository, building_blocks: &[&str], rxns: &[&str]) {
  let source = SourceIdentity::new("routes", "1", "seed").expect("source");
  if !building_blocks.is_empty() {
    repo.insert_archive_compounds(&strings(building_blocks), &source).expect("ingest bb");
    repo.migrate_archive_to_workbench_compounds(&identity, BuildingBlockPolicy::Set(true), None)
        .expect("migrate bb");
  }
  repo.insert_archive_reactions(&strings(rxns), &source).expect("ingest reactions");
  repo.migrate_archive_to_workbench_reactions(&reactions, None).expect("migrate reactions");
}

fn by_smiles<'a>(rows: &'a [RouteNode], smiles: &str) -> Vec<&'a RouteNode> {
  rows.iter().filter(|r| r.compound_smiles == smiles).collect()
}

#[test]
fn two_step_route_stops_at_building_blocks() {
  let (repo, path) = open_repo();
  seed(&repo, &["A", "C"], &["A.B>>X", "C>>B"]);

  let rows = repo.select_reversed_synthesis_routes("X", 5).expect("routes");
  assert_eq!(rows.len(), 4);

  let x = by_smiles(&rows, "X")[0];
  assert_eq!(x.depth, 0);
  assert!(x.expand);
  assert_eq!(x.prior_reaction_id, None);
  assert_eq!(x.posterior_reaction_smiles.as_deref(), Some("A.B>>X"));
  assert!(!x.is_dead_end);

  let a = by_smiles(&rows, "A")[0];
  assert_eq!(a.depth, 1);
  assert!(a.is_building_block);
  assert!(a.is_dead_end);
  assert_eq!(a.prior_reaction_id, x.posterior_reaction_id);
  assert_eq!(a.posterior_reaction_id, None);

  let b = by_smiles(&rows, "B")[0];
  assert_eq!(b.depth, 1);
  assert!(!b.is_dead_end);
  assert_eq!(b.posterior_reaction_smiles.as_deref(), Some("C>>B"));

  let c = by_smiles(&rows, "C")[0];
  assert_eq!(c.depth, 2);
  assert!(c.is_building_block && c.is_dead_end);
  assert_eq!(c.prior_reaction_id, b.posterior_reaction_id);
  assert_eq!(c.path_ids(), vec![x.compound_id, b.compound_id, c.compound_id]);

  let depths: Vec<i64> = rows.iter().map(|r| r.depth).collect();
  assert_eq!(depths, vec![0, 1, 1, 2]);
  drop(repo);
  cleanup(path);
}

#[test]
fn forest_rebuilds_terminal_chains() {
  let (repo, path) = open_repo();
  seed(&repo, &["A", "C"], &["A.B>>X", "C>>B"]);
  let forest = repo.reversed_synthesis_route_forest("X", 5).expect("forest");
  assert_eq!(forest.roots().len(), 1);
  assert_eq!(forest.max_depth(), Some(2));

  let rows = forest.nodes();
  let first = by_smiles(rows, "X")[0].posterior_reaction_id.expect("first reaction");
  let second = by_smiles(rows, "B")[0].posterior_reaction_id.expect("second reaction");
  let chains: Vec<(Vec<i64>, String)> =
    forest.terminal_chains().into_iter().map(|c| (c.reactions, c.terminal.compound_smiles)).collect();
  assert_eq!(chains, vec![(vec![first], "A".to_string()), (vec![first, second], "C".to_string())]);

  let mut leaves: Vec<&str> = forest.leaves().iter().map(|n| n.compound_smiles.as_str()).collect();
  leaves.sort();
  assert_eq!(leaves, vec!["A", "C"]);
  drop(repo);
  cleanup(path);
}

#[test]
fn depth_is_bounded() {
  let (repo, path) = open_repo();
  seed(&repo, &[], &["C1>>C0", "C2>>C1", "C3>>C2", "C4>>C3", "C5>>C4"]);

  let rows = repo.select_reversed_synthesis_routes("C0", 3).expect("routes");
  assert_eq!(rows.len(), 4);
  assert_eq!(rows.iter().map(|r| r.depth).max(), Some(3));
  let last = rows.iter().find(|r| r.depth == 3).expect("deepest row");
  assert_eq!(last.compound_smiles, "C3");
  assert!(!last.expand);
  assert!(last.is_dead_end);
  assert_eq!(last.posterior_reaction_id, None);
  let inner = rows.iter().find(|r| r.depth == 2).expect("inner row");
  assert!(inner.expand);
  assert!(!inner.is_dead_end);
  assert_eq!(inner.posterior_reaction_smiles.as_deref(), Some("C3>>C2"));

  let full = repo.select_reversed_synthesis_routes("C0", 10).expect("routes");
  assert_eq!(full.len(), 6);
  let end = full.iter().find(|r| r.compound_smiles == "C5").expect("C5");
  assert_eq!(end.depth, 5);
  assert!(end.expand);
  assert!(end.is_dead_end);
  drop(repo);
  cleanup(path);
}

#[test]
fn depth_one_lists_precursors_without_expanding_them() {
  let (repo, path) = open_repo();
  seed(&repo, &["A", "C"], &["A.B>>X", "C>>B"]);
  let rows = repo.select_reversed_synthesis_routes("X", 1).expect("routes");
  assert_eq!(rows.len(), 3);
  assert!(rows[0].expand);
  let b = by_smiles(&rows, "B")[0];
  assert_eq!(b.depth, 1);
  assert!(!b.expand);
  assert!(b.is_dead_end);
  assert_eq!(b.posterior_reaction_id, None);
  assert!(by_smiles(&rows, "C").is_empty());
  drop(repo);
  cleanup(path);
}

#[test]
fn zero_depth_returns_only_the_target() {
  let (repo, path) = open_repo();
  seed(&repo, &[], &["A>>X"]);
  let rows = repo.select_reversed_synthesis_routes("X", 0).expect("routes");
  assert_eq!(rows.len(), 1);
  assert!(!rows[0].expand);
  assert!(rows[0].is_dead_end);
  assert_eq!(rows[0].posterior_reaction_id, None);
  drop(repo);
  cleanup(path);
}

#[test]
fn cycles_terminate() {
  let (repo, path) = open_repo();
  seed(&repo, &[], &["A>>B", "B>>A"]);
  let rows = repo.select_reversed_synthesis_routes("A", 50).expect("routes");
  assert_eq!(rows.len(), 3);
  let repeated = rows.iter().find(|r| r.depth == 2).expect("repeated A");
  assert_eq!(repeated.compound_smiles, "A");
  assert!(!repeated.expand);
  assert!(repeated.is_dead_end);
  assert!(rows.iter().all(|r| {
                      let ids = r.path_ids();
                      ids.len() as i64 == r.depth + 1
                    }));
  drop(repo);
  cleanup(path);
}

#[test]
fn building_block_target_is_not_expanded() {
  let (repo, path) = open_repo();
  seed(&repo, &["X"], &["A>>X"]);
  let rows = repo.select_reversed_synthesis_routes("X", 5).expect("routes");
  assert_eq!(rows.len(), 1);
  assert!(rows[0].is_building_block);
  assert!(rows[0].is_dead_end);
  drop(repo);
  cleanup(path);
}

#[test]
fn every_producing_reaction_is_a_root() {
  let (repo, path) = open_repo();
  seed(&repo, &["A", "B"], &["A>>X", "B>>X"]);
  let forest = repo.reversed_synthesis_route_forest("X", 5).expect("forest");
  let roots = forest.roots();
  assert_eq!(roots.len(), 2);
  for root in roots {
    assert_eq!(forest.precursors(root).len(), 1);
  }
  assert_eq!(forest.terminal_chains().len(), 2);
  drop(repo);
  cleanup(path);
}

#[test]
fn target_without_producers_is_a_single_dead_end() {
  let (repo, path) = open_repo();
  seed(&repo, &[], &["A>>X"]);
  let rows = repo.select_reversed_synthesis_routes("A", 5).expect("routes");
  assert_eq!(rows.len(), 1);
  assert!(rows[0].expand);
  assert!(rows[0].is_dead_end);
  drop(repo);
  cleanup(path);
}

#[test]
fn unknown_target_is_empty() {
  let (repo, path) = open_repo();
  seed(&repo, &[], &["A>>X"]);
  assert!(repo.select_reversed_synthesis_routes("Q", 5).expect("routes").is_empty());
  assert!(repo.select_reversed_synthesis_routes(9999_i64, 5).expect("routes").is_empty());
  drop(repo);
  cleanup(path);
}

#[test]
fn negative_depth_is_rejected() {
  let (repo, path) = open_repo();
  match repo.select_reversed_synthesis_routes("X", -1) {
    Err(PersistenceError::Validation(_)) => {}
    other => panic!("expected validation error, got: {:?}", other),
  }
  drop(repo);
  cleanup(path);
}

#[test]
fn lookup_by_id_matches_lookup_by_smiles() {
  let (repo, path) = open_repo();
  seed(&repo, &["A", "C"], &["A.B>>X", "C>>B"]);
  let by_name = repo.select_reversed_synthesis_routes("X", 5).expect("by smiles");
  let id = by_name[0].compound_id;
  let by_id = repo.select_reversed_synthesis_routes(id, 5).expect("by id");
  assert_eq!(by_name, by_id);
  drop(repo);
  cleanup(path);
}

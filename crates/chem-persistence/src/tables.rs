// tables.rs
//! Nombres de tablas y columnas por tipo químico y capa. Las sentencias
//! genéricas (upsert, enlaces, consultas) se arman a partir de estos
//! descriptores; los nombres vienen siempre de constantes, nunca de la
//! entrada del usuario.
use chem_domain::{ChemicalKind, Role};

/// Tabla de entidades con columna canónica única.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTable {
  pub name: &'static str,
  pub column: &'static str,
}

/// Tabla de unión `(left, right)` con clave primaria compuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
  pub table: &'static str,
  pub left: &'static str,
  pub right: &'static str,
}

pub fn archive_table(kind: ChemicalKind) -> EntityTable {
  match kind {
    ChemicalKind::Compound => EntityTable { name: "archive_compound", column: "smiles" },
    ChemicalKind::CompoundPattern => EntityTable { name: "archive_compound_pattern", column: "smarts" },
    ChemicalKind::Reaction => EntityTable { name: "archive_reaction", column: "smiles" },
    ChemicalKind::ReactionPattern => EntityTable { name: "archive_reaction_pattern", column: "smarts" },
  }
}

pub fn workbench_table(kind: ChemicalKind) -> EntityTable {
  match kind {
    ChemicalKind::Compound => EntityTable { name: "workbench_compound", column: "smiles" },
    ChemicalKind::CompoundPattern => EntityTable { name: "workbench_compound_pattern", column: "smarts" },
    ChemicalKind::Reaction => EntityTable { name: "workbench_reaction", column: "smiles" },
    ChemicalKind::ReactionPattern => EntityTable { name: "workbench_reaction_pattern", column: "smarts" },
  }
}

/// `(archive entity, archive_source)`.
pub fn archive_source_junction(kind: ChemicalKind) -> Junction {
  match kind {
    ChemicalKind::Compound => {
      Junction { table: "archive_compound_source", left: "archive_compound_id", right: "archive_source_id" }
    }
    ChemicalKind::CompoundPattern => Junction { table: "archive_compound_pattern_source",
                                                left: "archive_compound_pattern_id",
                                                right: "archive_source_id" },
    ChemicalKind::Reaction => {
      Junction { table: "archive_reaction_source", left: "archive_reaction_id", right: "archive_source_id" }
    }
    ChemicalKind::ReactionPattern => Junction { table: "archive_reaction_pattern_source",
                                                left: "archive_reaction_pattern_id",
                                                right: "archive_source_id" },
  }
}

/// `(workbench entity, archive entity)`.
pub fn provenance_junction(kind: ChemicalKind) -> Junction {
  match kind {
    ChemicalKind::Compound => {
      Junction { table: "workbench_compound_archive", left: "workbench_compound_id", right: "archive_compound_id" }
    }
    ChemicalKind::CompoundPattern => Junction { table: "workbench_compound_pattern_archive",
                                                left: "workbench_compound_pattern_id",
                                                right: "archive_compound_pattern_id" },
    ChemicalKind::Reaction => {
      Junction { table: "workbench_reaction_archive", left: "workbench_reaction_id", right: "archive_reaction_id" }
    }
    ChemicalKind::ReactionPattern => Junction { table: "workbench_reaction_pattern_archive",
                                                left: "workbench_reaction_pattern_id",
                                                right: "archive_reaction_pattern_id" },
  }
}

/// `(reaction, participant)` para el rol dado. Sólo existe para reacciones y
/// patrones de reacción.
pub fn role_junction(kind: ChemicalKind, role: Role) -> Option<Junction> {
  let j = match (kind, role) {
    (ChemicalKind::Reaction, Role::Reactant) => Junction { table: "workbench_reaction_reactant_compound",
                                                           left: "workbench_reaction_id",
                                                           right: "workbench_compound_id" },
    (ChemicalKind::Reaction, Role::Spectator) => Junction { table: "workbench_reaction_spectator_compound",
                                                            left: "workbench_reaction_id",
                                                            right: "workbench_compound_id" },
    (ChemicalKind::Reaction, Role::Product) => Junction { table: "workbench_reaction_product_compound",
                                                          left: "workbench_reaction_id",
                                                          right: "workbench_compound_id" },
    (ChemicalKind::ReactionPattern, Role::Reactant) => {
      Junction { table: "workbench_reaction_pattern_reactant_compound_pattern",
                 left: "workbench_reaction_pattern_id",
                 right: "workbench_compound_pattern_id" }
    }
    (ChemicalKind::ReactionPattern, Role::Spectator) => {
      Junction { table: "workbench_reaction_pattern_spectator_compound_pattern",
                 left: "workbench_reaction_pattern_id",
                 right: "workbench_compound_pattern_id" }
    }
    (ChemicalKind::ReactionPattern, Role::Product) => {
      Junction { table: "workbench_reaction_pattern_product_compound_pattern",
                 left: "workbench_reaction_pattern_id",
                 right: "workbench_compound_pattern_id" }
    }
    _ => return None,
  };
  Some(j)
}

/// `(workbench_compound, workbench_compound_pattern)`.
pub const STRUCTURE_PATTERN: Junction = Junction { table: "workbench_compound_structure_pattern",
                                                   left: "workbench_compound_id",
                                                   right: "workbench_compound_pattern_id" };

/// `(workbench_reaction, workbench_reaction_pattern)`.
pub const TRANSFORMATION_PATTERN: Junction = Junction { table: "workbench_reaction_transformation_pattern",
                                                        left: "workbench_reaction_id",
                                                        right: "workbench_reaction_pattern_id" };

/// Todas las tablas, en orden de creación.
pub const ALL_TABLES: [&str; 25] = ["archive_source",
                                    "archive_compound",
                                    "archive_compound_pattern",
                                    "archive_reaction",
                                    "archive_reaction_pattern",
                                    "archive_compound_source",
                                    "archive_compound_pattern_source",
                                    "archive_reaction_source",
                                    "archive_reaction_pattern_source",
                                    "workbench_compound",
                                    "workbench_compound_pattern",
                                    "workbench_reaction",
                                    "workbench_reaction_pattern",
                                    "workbench_compound_archive",
                                    "workbench_compound_pattern_archive",
                                    "workbench_reaction_archive",
                                    "workbench_reaction_pattern_archive",
                                    "workbench_reaction_reactant_compound",
                                    "workbench_reaction_spectator_compound",
                                    "workbench_reaction_product_compound",
                                    "workbench_reaction_pattern_reactant_compound_pattern",
                                    "workbench_reaction_pattern_spectator_compound_pattern",
                                    "workbench_reaction_pattern_product_compound_pattern",
                                    "workbench_compound_structure_pattern",
                                    "workbench_reaction_transformation_pattern"];

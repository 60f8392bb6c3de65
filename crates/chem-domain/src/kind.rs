// kind.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Los cuatro tipos de objeto químico que maneja el almacén. Cada uno existe
/// tanto en la capa archive como en la capa workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalKind {
  Compound,
  CompoundPattern,
  Reaction,
  ReactionPattern,
}

impl ChemicalKind {
  pub const ALL: [ChemicalKind; 4] =
    [ChemicalKind::Compound, ChemicalKind::CompoundPattern, ChemicalKind::Reaction, ChemicalKind::ReactionPattern];

  /// Los tipos de reacción tienen participantes con rol (reactivo, espectador,
  /// producto); los tipos de compuesto no.
  pub fn has_roles(&self) -> bool {
    matches!(self, ChemicalKind::Reaction | ChemicalKind::ReactionPattern)
  }

  /// Tipo de los participantes de una reacción o patrón de reacción.
  pub fn participant_kind(&self) -> Option<ChemicalKind> {
    match self {
      ChemicalKind::Reaction => Some(ChemicalKind::Compound),
      ChemicalKind::ReactionPattern => Some(ChemicalKind::CompoundPattern),
      _ => None,
    }
  }
}

impl fmt::Display for ChemicalKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      ChemicalKind::Compound => "chemical compounds",
      ChemicalKind::CompoundPattern => "chemical compound patterns",
      ChemicalKind::Reaction => "chemical reactions",
      ChemicalKind::ReactionPattern => "chemical reaction patterns",
    };
    f.write_str(label)
  }
}

/// Rol de un participante dentro de una reacción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Reactant,
  Spectator,
  Product,
}

impl Role {
  pub const ALL: [Role; 3] = [Role::Reactant, Role::Spectator, Role::Product];

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Reactant => "reactant",
      Role::Spectator => "spectator",
      Role::Product => "product",
    }
  }
}

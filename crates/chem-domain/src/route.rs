// route.rs
//! Rutas de síntesis invertidas.
//!
//! La consulta recursiva devuelve filas planas; `RouteForest` reconstruye el
//! árbol en memoria a partir del `path` y de los ids de reacción previa y
//! posterior de cada fila.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separador de ids dentro de `RouteNode::path`.
pub const PATH_SEPARATOR: &str = "->";

/// Compuesto objetivo de una búsqueda de rutas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundRef {
  Id(i64),
  Smiles(String),
}

impl From<i64> for CompoundRef {
  fn from(id: i64) -> Self {
    CompoundRef::Id(id)
  }
}

impl From<&str> for CompoundRef {
  fn from(smiles: &str) -> Self {
    CompoundRef::Smiles(smiles.to_string())
  }
}

impl From<String> for CompoundRef {
  fn from(smiles: String) -> Self {
    CompoundRef::Smiles(smiles)
  }
}

impl fmt::Display for CompoundRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CompoundRef::Id(id) => write!(f, "id={}", id),
      CompoundRef::Smiles(s) => write!(f, "smiles={}", s),
    }
  }
}

/// Una fila del recorrido: un compuesto alcanzado a cierta profundidad por
/// una rama concreta, junto con la reacción que lo consume (`prior`) y una
/// reacción que lo produce (`posterior`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
  pub path: String,
  pub depth: i64,
  pub expand: bool,
  pub compound_id: i64,
  pub compound_smiles: String,
  pub is_building_block: bool,
  pub prior_reaction_id: Option<i64>,
  pub posterior_reaction_id: Option<i64>,
  pub posterior_reaction_smiles: Option<String>,
  pub is_dead_end: bool,
}

impl RouteNode {
  /// Ids de compuesto de la rama, desde el objetivo hasta este nodo.
  pub fn path_ids(&self) -> Vec<i64> {
    self.path.split(PATH_SEPARATOR).filter_map(|p| p.parse::<i64>().ok()).collect()
  }

  fn is_parent_of(&self, other: &RouteNode) -> bool {
    match self.posterior_reaction_id {
      Some(posterior) => {
        other.depth == self.depth + 1
        && other.prior_reaction_id == Some(posterior)
        && other.path.len() > self.path.len() + PATH_SEPARATOR.len()
        && other.path.starts_with(&self.path)
        && other.path[self.path.len()..].starts_with(PATH_SEPARATOR)
      }
      None => false,
    }
  }
}

/// Cadena de reacciones desde el objetivo hasta un nodo terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteChain {
  pub reactions: Vec<i64>,
  pub terminal: RouteNode,
}

/// Bosque de rutas reconstruido a partir de las filas de la consulta.
#[derive(Debug, Clone, Default)]
pub struct RouteForest {
  nodes: Vec<RouteNode>,
}

impl RouteForest {
  pub fn new(nodes: Vec<RouteNode>) -> Self {
    Self { nodes }
  }

  pub fn nodes(&self) -> &[RouteNode] {
    &self.nodes
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn max_depth(&self) -> Option<i64> {
    self.nodes.iter().map(|n| n.depth).max()
  }

  /// Filas de profundidad cero: una por cada reacción que produce el objetivo
  /// (o una sola si nada lo produce).
  pub fn roots(&self) -> Vec<&RouteNode> {
    self.nodes.iter().filter(|n| n.depth == 0).collect()
  }

  /// Reactivos de la reacción posterior de `node` dentro de la misma rama.
  pub fn precursors(&self, node: &RouteNode) -> Vec<&RouteNode> {
    self.nodes.iter().filter(|n| node.is_parent_of(n)).collect()
  }

  /// Compuestos distintos que aparecen como nodos terminales.
  pub fn leaves(&self) -> Vec<&RouteNode> {
    let mut seen = std::collections::HashSet::new();
    self.nodes.iter().filter(|n| n.is_dead_end && seen.insert(n.compound_id)).collect()
  }

  /// Recorre el bosque en profundidad y devuelve, por cada nodo terminal, la
  /// secuencia de reacciones que lleva hasta él.
  pub fn terminal_chains(&self) -> Vec<RouteChain> {
    let mut out = Vec::new();
    for root in self.roots() {
      self.collect_chains(root, &mut Vec::new(), &mut out);
    }
    out
  }

  fn collect_chains(&self, node: &RouteNode, reactions: &mut Vec<i64>, out: &mut Vec<RouteChain>) {
    let children = self.precursors(node);
    if node.is_dead_end || children.is_empty() {
      out.push(RouteChain { reactions: reactions.clone(), terminal: node.clone() });
      return;
    }
    if let Some(posterior) = node.posterior_reaction_id {
      reactions.push(posterior);
      for child in children {
        self.collect_chains(child, reactions, out);
      }
      reactions.pop();
    }
  }
}

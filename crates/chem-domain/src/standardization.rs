// standardization.rs
//! Estrategias inyectadas de estandarización y extracción.
//!
//! El almacén no sabe nada de quimioinformática: recibe funciones puras que
//! transforman un lote de cadenas en otro lote de la misma longitud. Una
//! posición `None` significa que el registro fue rechazado. Cualquier closure
//! con la misma firma implementa el trait correspondiente.
use serde::{Deserialize, Serialize};

/// Una reacción (o patrón de reacción) ya canonizada, con sus participantes
/// separados por rol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedReaction {
  pub canonical: String,
  pub reactants: Vec<String>,
  pub spectators: Vec<String>,
  pub products: Vec<String>,
}

impl StandardizedReaction {
  pub fn new(canonical: impl Into<String>,
             reactants: Vec<String>,
             spectators: Vec<String>,
             products: Vec<String>)
             -> Self {
    Self { canonical: canonical.into(), reactants, spectators, products }
  }

  /// Todas las cadenas de participantes, en orden reactivos, espectadores,
  /// productos.
  pub fn participants(&self) -> impl Iterator<Item = &String> {
    self.reactants.iter().chain(self.spectators.iter()).chain(self.products.iter())
  }
}

/// Canoniza compuestos (o patrones de compuesto).
pub trait CompoundStandardizer {
  fn standardize(&self, inputs: &[String]) -> Vec<Option<String>>;
}

impl<F> CompoundStandardizer for F where F: Fn(&[String]) -> Vec<Option<String>>
{
  fn standardize(&self, inputs: &[String]) -> Vec<Option<String>> {
    self(inputs)
  }
}

/// Canoniza reacciones. Una entrada puede producir varias reacciones
/// canónicas (abanico); la extracción de patrones de transformación usa el
/// mismo contrato, devolviendo SMARTS en lugar de SMILES.
pub trait ReactionStandardizer {
  fn standardize(&self, inputs: &[String]) -> Vec<Option<Vec<StandardizedReaction>>>;
}

impl<F> ReactionStandardizer for F where F: Fn(&[String]) -> Vec<Option<Vec<StandardizedReaction>>>
{
  fn standardize(&self, inputs: &[String]) -> Vec<Option<Vec<StandardizedReaction>>> {
    self(inputs)
  }
}

/// Asigna a cada compuesto los patrones de estructura que contiene.
pub trait CompoundPatternMatcher {
  fn match_patterns(&self, inputs: &[String]) -> Vec<Option<Vec<String>>>;
}

impl<F> CompoundPatternMatcher for F where F: Fn(&[String]) -> Vec<Option<Vec<String>>>
{
  fn match_patterns(&self, inputs: &[String]) -> Vec<Option<Vec<String>>> {
    self(inputs)
  }
}

/// Qué hacer con la bandera `is_building_block` al migrar compuestos.
#[derive(Debug, Clone, Copy, Default)]
pub enum BuildingBlockPolicy {
  /// Inserta sin tocar la bandera de filas existentes; las nuevas quedan en
  /// `false`.
  #[default]
  Keep,
  /// Fija la bandera al valor dado en cada compuesto migrado.
  Set(bool),
  /// Evalúa la bandera sobre la cadena ya estandarizada.
  PerRecord(fn(&str) -> bool),
}

impl BuildingBlockPolicy {
  /// Valor de la bandera para `smiles`, o `None` si no debe modificarse.
  pub fn flag_for(&self, smiles: &str) -> Option<bool> {
    match self {
      BuildingBlockPolicy::Keep => None,
      BuildingBlockPolicy::Set(v) => Some(*v),
      BuildingBlockPolicy::PerRecord(f) => Some(f(smiles)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn upper(inputs: &[String]) -> Vec<Option<String>> {
    inputs.iter().map(|s| if s.is_empty() { None } else { Some(s.to_uppercase()) }).collect()
  }

  #[test]
  fn plain_functions_are_standardizers() {
    let out = CompoundStandardizer::standardize(&upper, &["cco".to_string(), String::new()]);
    assert_eq!(out, vec![Some("CCO".to_string()), None]);
  }

  #[test]
  fn closures_are_pattern_matchers() {
    let matcher = |inputs: &[String]| -> Vec<Option<Vec<String>>> {
      inputs.iter().map(|s| Some(vec![format!("[{}]", s)])).collect()
    };
    let out = matcher.match_patterns(&["C".to_string()]);
    assert_eq!(out, vec![Some(vec!["[C]".to_string()])]);
  }

  #[test]
  fn building_block_policy_flags() {
    fn short(s: &str) -> bool {
      s.len() < 3
    }
    assert_eq!(BuildingBlockPolicy::Keep.flag_for("CCO"), None);
    assert_eq!(BuildingBlockPolicy::Set(true).flag_for("CCO"), Some(true));
    assert_eq!(BuildingBlockPolicy::PerRecord(short).flag_for("CC"), Some(true));
    assert_eq!(BuildingBlockPolicy::PerRecord(short).flag_for("CCCC"), Some(false));
  }

  #[test]
  fn participants_keep_role_order() {
    let r = StandardizedReaction::new("A.B>C>D",
                                      vec!["A".into(), "B".into()],
                                      vec!["C".into()],
                                      vec!["D".into()]);
    let all: Vec<&String> = r.participants().collect();
    assert_eq!(all, vec!["A", "B", "C", "D"]);
  }
}

// adapters.rs
//! Adaptadores que convierten una función por registro en una estrategia por
//! lote ejecutada sobre un `WorkerPool`.
use crate::WorkerPool;
use chem_domain::{CompoundPatternMatcher, CompoundStandardizer, ReactionStandardizer, StandardizedReaction};
use std::sync::Arc;

pub struct PooledCompoundStandardizer<F> {
  pool: Arc<WorkerPool>,
  f: Arc<F>,
}

impl<F> PooledCompoundStandardizer<F> where F: Fn(&str) -> Option<String> + Send + Sync + 'static
{
  pub fn new(pool: Arc<WorkerPool>, f: F) -> Self {
    Self { pool, f: Arc::new(f) }
  }
}

impl<F> CompoundStandardizer for PooledCompoundStandardizer<F> where F: Fn(&str) -> Option<String> + Send + Sync + 'static
{
  fn standardize(&self, inputs: &[String]) -> Vec<Option<String>> {
    let f = Arc::clone(&self.f);
    self.pool.map(inputs, move |s: &String| f(s.as_str())).into_iter().map(Option::flatten).collect()
  }
}

pub struct PooledReactionStandardizer<F> {
  pool: Arc<WorkerPool>,
  f: Arc<F>,
}

impl<F> PooledReactionStandardizer<F> where F: Fn(&str) -> Option<Vec<StandardizedReaction>> + Send + Sync + 'static
{
  pub fn new(pool: Arc<WorkerPool>, f: F) -> Self {
    Self { pool, f: Arc::new(f) }
  }
}

impl<F> ReactionStandardizer for PooledReactionStandardizer<F>
  where F: Fn(&str) -> Option<Vec<StandardizedReaction>> + Send + Sync + 'static
{
  fn standardize(&self, inputs: &[String]) -> Vec<Option<Vec<StandardizedReaction>>> {
    let f = Arc::clone(&self.f);
    self.pool.map(inputs, move |s: &String| f(s.as_str())).into_iter().map(Option::flatten).collect()
  }
}

pub struct PooledCompoundPatternMatcher<F> {
  pool: Arc<WorkerPool>,
  f: Arc<F>,
}

impl<F> PooledCompoundPatternMatcher<F> where F: Fn(&str) -> Option<Vec<String>> + Send + Sync + 'static
{
  pub fn new(pool: Arc<WorkerPool>, f: F) -> Self {
    Self { pool, f: Arc::new(f) }
  }
}

impl<F> CompoundPatternMatcher for PooledCompoundPatternMatcher<F>
  where F: Fn(&str) -> Option<Vec<String>> + Send + Sync + 'static
{
  fn match_patterns(&self, inputs: &[String]) -> Vec<Option<Vec<String>>> {
    let f = Arc::clone(&self.f);
    self.pool.map(inputs, move |s: &String| f(s.as_str())).into_iter().map(Option::flatten).collect()
  }
}

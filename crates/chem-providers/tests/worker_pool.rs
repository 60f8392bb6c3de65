use chem_domain::{CompoundStandardizer, ReactionStandardizer, StandardizedReaction};
use chem_providers::{PooledCompoundStandardizer, PooledReactionStandardizer, ProviderError, WorkerPool};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn map_preserves_input_order() {
  let pool = WorkerPool::new(4).expect("pool");
  let inputs: Vec<u64> = (0..200).collect();
  let out = pool.map(&inputs, |x| x * 2);
  let expected: Vec<Option<u64>> = inputs.iter().map(|x| Some(x * 2)).collect();
  assert_eq!(out, expected);
}

#[test]
fn panicking_item_becomes_none() {
  let pool = WorkerPool::new(2).expect("pool");
  let inputs = vec![1, 2, 3];
  let out = pool.map(&inputs, |x| {
                  if *x == 2 {
                    panic!("bad record");
                  }
                  *x
                });
  assert_eq!(out, vec![Some(1), None, Some(3)]);
}

#[test]
fn slow_item_is_abandoned_after_deadline() {
  let pool = WorkerPool::new(3).expect("pool").with_timeout(Duration::from_millis(200));
  let inputs = vec![10u64, 3000, 10];
  let started = Instant::now();
  let out = pool.map(&inputs, |ms| {
                  std::thread::sleep(Duration::from_millis(*ms));
                  *ms
                });
  assert_eq!(out, vec![Some(10), None, Some(10)]);
  assert!(started.elapsed() < Duration::from_millis(2000), "slow item blocked the batch");
}

#[test]
fn panics_are_isolated_with_deadline_too() {
  let pool = WorkerPool::new(2).expect("pool").with_timeout(Duration::from_secs(2));
  let inputs = vec!["ok".to_string(), "boom".to_string()];
  let out = pool.map(&inputs, |s| {
                  if s == "boom" {
                    panic!("boom");
                  }
                  s.len()
                });
  assert_eq!(out, vec![Some(2), None]);
}

#[test]
fn zero_workers_is_rejected() {
  match WorkerPool::new(0) {
    Err(ProviderError::InvalidConfiguration(_)) => {}
    other => panic!("expected invalid configuration, got: {:?}", other.map(|p| p.workers())),
  }
}

#[test]
fn pooled_compound_standardizer_keeps_rejections() {
  let pool = Arc::new(WorkerPool::new(2).expect("pool"));
  let std = PooledCompoundStandardizer::new(pool, |s: &str| {
    if s.contains('X') {
      None
    } else {
      Some(s.to_uppercase())
    }
  });
  let out = std.standardize(&["cco".to_string(), "cXc".to_string(), "n".to_string()]);
  assert_eq!(out, vec![Some("CCO".to_string()), None, Some("N".to_string())]);
}

#[test]
fn pooled_reaction_standardizer_fans_out() {
  let pool = Arc::new(WorkerPool::new(2).expect("pool"));
  let std = PooledReactionStandardizer::new(pool, |s: &str| {
    let (left, right) = s.split_once(">>")?;
    let reactants: Vec<String> = left.split('.').map(|p| p.to_string()).collect();
    Some(vec![StandardizedReaction::new(s, reactants, vec![], vec![right.to_string()])])
  });
  let out = std.standardize(&["A.B>>C".to_string(), "garbage".to_string()]);
  assert_eq!(out.len(), 2);
  let first = out[0].as_ref().expect("parsed");
  assert_eq!(first[0].reactants, vec!["A".to_string(), "B".to_string()]);
  assert!(out[1].is_none());
}

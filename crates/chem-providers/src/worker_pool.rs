// worker_pool.rs
use crate::ProviderError;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Pool acotado de trabajadores para aplicar una función pura a un lote.
///
/// `map` siempre devuelve un resultado por entrada y en el mismo orden. Un
/// pánico en un elemento se convierte en `None` sin afectar a los demás. Con
/// `with_timeout` cada elemento corre en su propio hilo y se abandona (y se
/// reemplaza por `None`) si no termina a tiempo; el hilo abandonado no
/// bloquea al resto del lote.
pub struct WorkerPool {
  pool: rayon::ThreadPool,
  workers: usize,
  timeout: Option<Duration>,
}

impl WorkerPool {
  pub fn new(workers: usize) -> Result<Self, ProviderError> {
    if workers == 0 {
      return Err(ProviderError::InvalidConfiguration("el pool necesita al menos un trabajador".to_string()));
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers)
                                              .thread_name(|i| format!("chem-worker-{}", i))
                                              .build()?;
    Ok(Self { pool, workers, timeout: None })
  }

  /// Lee `CHEMROUTE_WORKERS` y `CHEMROUTE_WORKER_TIMEOUT_MS` (con `.env`).
  pub fn from_env() -> Result<Self, ProviderError> {
    dotenvy::dotenv().ok();
    let workers = match std::env::var("CHEMROUTE_WORKERS") {
      Ok(v) => v.parse::<usize>()
                .map_err(|e| ProviderError::InvalidConfiguration(format!("CHEMROUTE_WORKERS={}: {}", v, e)))?,
      Err(_) => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
    };
    let pool = Self::new(workers)?;
    match std::env::var("CHEMROUTE_WORKER_TIMEOUT_MS") {
      Ok(v) => {
        let ms = v.parse::<u64>()
                  .map_err(|e| ProviderError::InvalidConfiguration(format!("CHEMROUTE_WORKER_TIMEOUT_MS={}: {}", v, e)))?;
        Ok(pool.with_timeout(Duration::from_millis(ms)))
      }
      Err(_) => Ok(pool),
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  pub fn workers(&self) -> usize {
    self.workers
  }

  pub fn timeout(&self) -> Option<Duration> {
    self.timeout
  }

  pub fn map<I, T, F>(&self, inputs: &[I], f: F) -> Vec<Option<T>>
    where I: Clone + Send + Sync + 'static,
          T: Send + 'static,
          F: Fn(&I) -> T + Send + Sync + 'static
  {
    let f = Arc::new(f);
    match self.timeout {
      None => self.pool.install(|| {
                         inputs.par_iter()
                               .enumerate()
                               .map(|(idx, item)| match catch_unwind(AssertUnwindSafe(|| f(item))) {
                                 Ok(out) => Some(out),
                                 Err(_) => {
                                   log::warn!("worker panicked on item {}", idx);
                                   None
                                 }
                               })
                               .collect()
                       }),
      Some(timeout) => self.pool.install(|| {
                                  inputs.par_iter()
                                        .enumerate()
                                        .map(|(idx, item)| run_with_deadline(idx, item.clone(), Arc::clone(&f), timeout))
                                        .collect()
                                }),
    }
  }
}

fn run_with_deadline<I, T, F>(idx: usize, item: I, f: Arc<F>, timeout: Duration) -> Option<T>
  where I: Send + 'static,
        T: Send + 'static,
        F: Fn(&I) -> T + Send + Sync + 'static
{
  let (tx, rx) = mpsc::channel();
  let task = move || {
    let out = catch_unwind(AssertUnwindSafe(|| f(&item)));
    // el receptor puede haberse ido por timeout
    let _ = tx.send(out);
  };
  let spawned = thread::Builder::new().name(format!("chem-task-{}", idx)).spawn(task);
  if let Err(e) = spawned {
    log::warn!("could not spawn task for item {}: {}", idx, e);
    return None;
  }
  match rx.recv_timeout(timeout) {
    Ok(Ok(out)) => Some(out),
    Ok(Err(_)) => {
      log::warn!("task panicked on item {}", idx);
      None
    }
    Err(mpsc::RecvTimeoutError::Timeout) => {
      log::warn!("task for item {} exceeded {:?}; abandoned", idx, timeout);
      None
    }
    Err(mpsc::RecvTimeoutError::Disconnected) => None,
  }
}

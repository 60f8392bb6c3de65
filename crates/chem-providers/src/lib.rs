//! Ejecución concurrente de las estrategias químicas inyectadas.
//!
//! El almacén llama a cada estrategia una vez por lote; este crate reparte el
//! lote entre un número acotado de trabajadores y aísla los fallos de cada
//! registro (pánicos y tiempos excedidos se convierten en rechazos).

mod adapters;
mod errors;
mod worker_pool;

pub use adapters::{PooledCompoundPatternMatcher, PooledCompoundStandardizer, PooledReactionStandardizer};
pub use errors::ProviderError;
pub use worker_pool::WorkerPool;

//! Persistencia Diesel/SQLite del almacén químico de dos capas.
//!
//! La capa archive guarda los registros crudos con su fuente; la capa
//! workbench guarda las entidades canónicas con provenance hacia archive y
//! las uniones por rol de las reacciones. `DieselChemRepository` es la
//! fachada; los módulos públicos exponen las mismas operaciones sobre una
//! conexión explícita.

mod config;
mod errors;
pub mod linker;
pub mod models;
pub mod pipeline;
pub mod query;
mod repository;
pub mod routes;
pub mod schema;
pub mod tables;
pub mod upsert;

pub use config::{in_memory_url, StoreConfig};
pub use errors::PersistenceError;
pub use pipeline::ChunkSummary;
pub use query::{Chunks, RoleFilter, SelectQuery, SqlValue};
pub use repository::{DbConn, DbPool, DieselChemRepository, MIGRATIONS};

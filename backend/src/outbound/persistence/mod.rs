//! SQLite persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Connections come from a `bb8` pool of `diesel-async`
//! `SyncConnectionWrapper`s, and every database error is mapped to the
//! port's error type before it leaves this module.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use students::outbound::persistence::{DbPool, DieselStudentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("storage/storage.db")).await?;
//! let repo = DieselStudentRepository::new(pool);
//! repo.ensure_schema().await?;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_student_repository;
mod models;
mod pool;
mod schema;

pub use diesel_student_repository::DieselStudentRepository;
pub use pool::{DbPool, PoolConfig, PoolError, SqliteConn};

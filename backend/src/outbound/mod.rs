//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: SQLite-backed repositories using Diesel ORM.
//! - **memory**: process-local repository for tests and ephemeral runs.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;

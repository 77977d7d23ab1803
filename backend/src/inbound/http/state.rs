//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see the port, so
//! they run against SQLite, the in-memory store or a mock without change.

use std::sync::Arc;

use crate::domain::ports::StudentRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub students: Arc<dyn StudentRepository>,
}

impl HttpState {
    /// Construct state from the student repository port.
    pub fn new(students: Arc<dyn StudentRepository>) -> Self {
        Self { students }
    }
}

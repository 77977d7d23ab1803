//! Student records service library.
//!
//! Hexagonal layout: `domain` holds the record, its validation and the
//! persistence port; `inbound` adapts HTTP onto the port; `outbound` holds
//! the SQLite and in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

//! HTTP inbound adapter exposing the student REST endpoints.

pub mod error;
pub mod health;
pub mod state;
pub mod students;
pub(crate) mod validation;

pub use error::ApiResult;

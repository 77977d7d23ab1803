//! HTTP server configuration object.

/// Seconds in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Listen on `bind_addr` (`host:port`) with the default shutdown timeout.
    #[must_use]
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            shutdown_timeout_secs: SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

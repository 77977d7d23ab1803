//! Signal-driven graceful shutdown.

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use actix_web::dev::ServerHandle;
use actix_web::web;
use tracing::{info, warn};

use students::inbound::http::health::HealthState;

use super::SHUTDOWN_TIMEOUT_SECS;

/// OS shutdown signal listeners.
///
/// Register them with [`ShutdownSignal::install`] before the server starts;
/// `main` treats a registration failure as fatal.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl ShutdownSignal {
    /// Register SIGTERM and SIGINT listeners (ctrl-c on Windows).
    ///
    /// # Errors
    /// Returns the OS error when a listener cannot be registered.
    #[cfg(unix)]
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(windows)]
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Wait for the first signal and name it.
    #[cfg(unix)]
    pub async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        }
    }

    #[cfg(windows)]
    pub async fn recv(mut self) -> &'static str {
        self.ctrl_c.recv().await;
        "ctrl-c"
    }
}

/// Wait for SIGINT or SIGTERM, then drain and stop the server.
pub async fn stop_on_signal(
    signal: ShutdownSignal,
    handle: ServerHandle,
    health_state: web::Data<HealthState>,
) {
    stop_when(signal.recv(), handle, health_state).await;
}

/// Drain and stop the server once `trigger` resolves.
///
/// Probes fail first so load balancers stop routing; the server then stops
/// accepting connections and gives in-flight requests up to
/// [`SHUTDOWN_TIMEOUT_SECS`] before closing them.
pub async fn stop_when<F>(trigger: F, handle: ServerHandle, health_state: web::Data<HealthState>)
where
    F: Future<Output = &'static str>,
{
    let reason = trigger.await;

    info!(reason, "shutting down server");
    health_state.mark_unhealthy();

    let started = Instant::now();
    handle.stop(true).await;
    let elapsed = started.elapsed();

    if elapsed >= Duration::from_secs(SHUTDOWN_TIMEOUT_SECS) {
        warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            "shutdown timeout reached; remaining connections were closed"
        );
    } else {
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            "server shutdown gracefully"
        );
    }
}

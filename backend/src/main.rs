//! Service entry point: loads settings, opens storage and serves the REST API
//! until SIGINT or SIGTERM.

mod server;

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use students::inbound::http::health::HealthState;
use students::inbound::http::state::HttpState;
use students::outbound::persistence::{DbPool, DieselStudentRepository, PoolConfig};
use students::settings::{Settings, SettingsError};

use server::{ServerConfig, ShutdownSignal, create_server, stop_on_signal};

fn prepare_storage_dir(storage_path: &Path) -> io::Result<()> {
    match storage_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|err| {
                io::Error::other(format!(
                    "create storage directory '{}': {err}",
                    parent.display()
                ))
            })
        }
        _ => Ok(()),
    }
}

async fn open_repository(settings: &Settings) -> io::Result<DieselStudentRepository> {
    prepare_storage_dir(&settings.storage_path)?;

    let database_path = settings.storage_path.to_string_lossy().into_owned();
    let pool = DbPool::new(PoolConfig::new(database_path))
        .await
        .map_err(|err| io::Error::other(format!("open storage: {err}")))?;
    let repository = DieselStudentRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|err| io::Error::other(format!("initialise storage schema: {err}")))?;
    Ok(repository)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(SettingsError::Args(err)) => err.exit(),
        Err(err) => return Err(io::Error::other(format!("load settings: {err}"))),
    };

    let repository = open_repository(&settings).await?;
    info!(
        env = %settings.env,
        version = env!("CARGO_PKG_VERSION"),
        storage_path = %settings.storage_path.display(),
        "storage initialized"
    );

    let shutdown_signal = ShutdownSignal::install()
        .map_err(|err| io::Error::other(format!("install shutdown signal handlers: {err}")))?;

    let health_state = web::Data::new(HealthState::new());
    let http_state = web::Data::new(HttpState::new(Arc::new(repository)));
    let server = create_server(
        health_state.clone(),
        http_state,
        ServerConfig::new(settings.address.clone()),
    )?;
    info!(address = %settings.address, "server started");

    actix_web::rt::spawn(stop_on_signal(
        shutdown_signal,
        server.handle(),
        health_state,
    ));
    server.await?;

    info!("server stopped");
    Ok(())
}

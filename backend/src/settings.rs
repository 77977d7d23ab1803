//! Service settings loaded from a YAML file.
//!
//! The file path comes from the `CONFIG_PATH` environment variable or, when
//! that is unset or empty, from the `--config` flag. `ENV` overrides the
//! `env` key. Every key is required:
//!
//! ```yaml
//! env: "dev"
//! storage_path: "storage/storage.db"
//! http_server:
//!   address: "127.0.0.1:8082"
//! ```

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use serde::Deserialize;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Environment variable overriding the `env` key.
pub const ENV_OVERRIDE: &str = "ENV";

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "students", about = "Student records REST service", version)]
pub struct CliArgs {
    /// Path to the YAML settings file. `CONFIG_PATH` takes precedence.
    #[arg(long = "config", value_name = "path")]
    pub config: Option<PathBuf>,
}

/// Errors raised while loading settings. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("settings path missing: set {CONFIG_PATH_ENV} or pass --config")]
    MissingPath,

    #[error("read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse settings file: {message}")]
    Parse { message: String },

    #[error("settings key '{field}' is required")]
    MissingField { field: &'static str },

    #[error("http_server.address '{value}' must be host:port")]
    InvalidAddress { value: String },
}

#[derive(Debug, Default, Deserialize)]
struct RawHttpServer {
    address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    env: Option<String>,
    storage_path: Option<PathBuf>,
    http_server: Option<RawHttpServer>,
}

/// Validated service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Deployment environment label, e.g. `dev` or `production`.
    pub env: String,
    /// SQLite database file.
    pub storage_path: PathBuf,
    /// Listen address for the HTTP server as `host:port`. The host may be a
    /// name, resolved when the server binds.
    pub address: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_address(value: &str) -> Result<String, SettingsError> {
    let invalid = || SettingsError::InvalidAddress {
        value: value.to_owned(),
    };
    let trimmed = value.trim();
    let (host, port) = trimmed.rsplit_once(':').ok_or_else(invalid)?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(invalid());
    }
    port.parse::<u16>().map_err(|_| invalid())?;
    Ok(trimmed.to_owned())
}

/// Pick the settings path: a non-empty environment value wins over the flag.
pub fn resolve_config_path(
    from_env: Option<String>,
    from_flag: Option<PathBuf>,
) -> Result<PathBuf, SettingsError> {
    non_blank(from_env)
        .map(PathBuf::from)
        .or_else(|| from_flag.filter(|p| !p.as_os_str().is_empty()))
        .ok_or(SettingsError::MissingPath)
}

fn read_settings_file(path: &Path) -> Result<String, SettingsError> {
    let read_error = |source: io::Error| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "settings path must name a file",
        ))
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    directory.read_to_string(file_name).map_err(read_error)
}

impl Settings {
    /// Load settings from the process arguments and environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from_iter(env::args_os())
    }

    /// Load settings using `args` in place of the process arguments.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = CliArgs::try_parse_from(args)?;
        let path = resolve_config_path(env::var(CONFIG_PATH_ENV).ok(), cli.config)?;
        let text = read_settings_file(&path)?;
        Self::from_yaml(&text, env::var(ENV_OVERRIDE).ok())
    }

    /// Parse and validate a settings document.
    ///
    /// A non-empty `env_override` replaces the `env` key.
    pub fn from_yaml(text: &str, env_override: Option<String>) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_yaml::from_str(text).map_err(|err| SettingsError::Parse {
            message: err.to_string(),
        })?;

        let env = non_blank(env_override)
            .or_else(|| non_blank(raw.env))
            .ok_or(SettingsError::MissingField { field: "env" })?;
        let storage_path = raw
            .storage_path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(SettingsError::MissingField {
                field: "storage_path",
            })?;
        let address = non_blank(raw.http_server.unwrap_or_default().address).ok_or(
            SettingsError::MissingField {
                field: "http_server.address",
            },
        )?;
        let address = validate_address(&address)?;

        Ok(Self {
            env,
            storage_path,
            address,
        })
    }
}

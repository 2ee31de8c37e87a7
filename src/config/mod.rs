//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `LEDGERMATCH_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::DEFAULT_INGEST_BATCH_SIZE;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LEDGERMATCH_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path of the invoice snapshot file. Default: `./.data/invoices.json`.
    pub store_path: PathBuf,

    /// Directory of the contact-encoder model files. Absent means the
    /// encoder runs in stub mode.
    pub model_dir: Option<PathBuf>,

    /// Batch size for ingest-time embedding precomputation. Default: `128`.
    pub ingest_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            store_path: PathBuf::from("./.data/invoices.json"),
            model_dir: None,
            ingest_batch_size: DEFAULT_INGEST_BATCH_SIZE,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "LEDGERMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "LEDGERMATCH_BIND_ADDR";
    const ENV_STORE_PATH: &'static str = "LEDGERMATCH_STORE_PATH";
    const ENV_MODEL_DIR: &'static str = "LEDGERMATCH_MODEL_DIR";
    const ENV_INGEST_BATCH: &'static str = "LEDGERMATCH_INGEST_BATCH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let store_path = Self::parse_path_from_env(Self::ENV_STORE_PATH, defaults.store_path);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let ingest_batch_size =
            Self::parse_usize_from_env(Self::ENV_INGEST_BATCH, defaults.ingest_batch_size);

        Ok(Self {
            port,
            bind_addr,
            store_path,
            model_dir,
            ingest_batch_size,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.exists() && !self.store_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.store_path.clone(),
            });
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.ingest_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

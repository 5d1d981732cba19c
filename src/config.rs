use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

/// Total connection budget shared by all workers.
pub const MAX_CONNECTIONS: usize = 1024;
/// Number of workers in the pool.
pub const WORKERS: usize = 4;
/// Read buffer capacity and per-write file chunk size.
pub const BUFFER_SIZE: usize = 8192;
/// Longest on-disk path (static root + request path) the resolver will build.
pub const MAX_PATH_LENGTH: usize = 2048;
/// Largest file that will be served.
pub const MAX_FILE_SIZE: u64 = 128 * 1024 * 1024;
/// Upper bound for a serialized response header block.
pub const HEADER_CAPACITY: usize = 1024;
/// Kernel accept backlog for the shared listener.
pub const LISTEN_BACKLOG: i32 = 128;

/// Connection slots owned by each worker.
pub const fn connections_per_worker() -> usize {
    MAX_CONNECTIONS / WORKERS
}

/// Command line of the server binary.
#[derive(Debug, Parser)]
#[command(name = "staticd", about = "Prefork static file server")]
pub struct Cli {
    /// Port to listen on (overrides the config file)
    pub port: Option<u16>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write sample files into the static root before serving
    #[arg(long)]
    pub seed_static: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    pub index: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./static"),
            index: "index.html".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: PathBuf::from("./logs/server.log"),
        }
    }
}

impl Config {
    /// Builds the effective configuration: defaults, then the YAML file named
    /// by `--config`, then the positional port.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = cli.port {
            cfg.server.port = port;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

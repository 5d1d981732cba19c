//! Diagnostic tracing setup and the on-disk access log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Appends timestamped lines to the server log file.
///
/// Logging is best-effort: a log file that cannot be opened or written is
/// ignored, and request handling carries on. Every line is also emitted as a
/// `tracing` event.
#[derive(Debug, Clone)]
pub struct AccessLog {
    enabled: bool,
    path: PathBuf,
}

impl AccessLog {
    pub fn new(enabled: bool, path: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            path: path.into(),
        }
    }

    pub fn from_config(cfg: &LoggingConfig) -> Self {
        Self::new(cfg.enabled, cfg.file.clone())
    }

    /// A log that never touches the filesystem.
    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn message(&self, message: &str) {
        tracing::debug!(target: "access", "{}", message);
        self.append(message);
    }

    pub fn request(&self, method: &str, path: &str, status: u16) {
        tracing::info!(target: "access", method, path, status, "request served");
        self.append(&format!("{} {} - {}", method, path, status));
    }

    fn append(&self, message: &str) {
        if !self.enabled {
            return;
        }

        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };

        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = file.write_all(format!("[{}] {}\n", now, message).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_is_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let log = AccessLog::new(true, &path);

        log.request("GET", "/index.html", 200);
        log.message("Worker 0 started");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] GET /index.html - 200"));
        assert!(lines[1].ends_with("] Worker 0 started"));
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let log = AccessLog::new(false, &path);

        log.request("GET", "/", 404);

        assert!(!path.exists());
    }

    #[test]
    fn unopenable_log_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let log = AccessLog::new(true, dir.path().join("missing-dir").join("server.log"));

        log.request("HEAD", "/", 200);
    }
}

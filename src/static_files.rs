//! Mapping request paths onto files under the static root.

use std::ffi::CString;
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::config::{MAX_FILE_SIZE, MAX_PATH_LENGTH, StaticFilesConfig};
use crate::http::mime;
use crate::http::response::StatusCode;

/// A file that passed every check and is open for reading.
///
/// Dropping it closes the descriptor.
#[derive(Debug)]
pub struct ResolvedFile {
    pub file: File,
    pub path: PathBuf,
    pub size: u64,
    pub content_type: &'static str,
}

/// The joined path would exceed the path length budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOverflow {
    pub len: usize,
    pub capacity: usize,
}

/// Joins `relative` under `root`, refusing results longer than `capacity`
/// bytes (one byte is reserved, matching a NUL-terminated path buffer).
pub fn join_bounded(root: &Path, relative: &str, capacity: usize) -> Result<PathBuf, PathOverflow> {
    let root_len = root.as_os_str().len();
    let len = root_len + 1 + relative.len();
    if len >= capacity {
        return Err(PathOverflow { len, capacity });
    }
    Ok(root.join(relative))
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index: String,
    max_path_len: usize,
    max_file_size: u64,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, index: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index: index.into(),
            max_path_len: MAX_PATH_LENGTH,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.index.clone())
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decides whether `request_path` is served and opens the file if so.
    ///
    /// The error is the status the client receives. Nothing is cached: every
    /// call stats and opens the file again.
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedFile, StatusCode> {
        if request_path.contains("..") {
            return Err(StatusCode::Forbidden);
        }

        // the target is taken literally; `?` and `#` are part of the file name
        let Some(rest) = request_path.strip_prefix('/') else {
            return Err(StatusCode::NotFound);
        };
        let relative = if rest.is_empty() {
            self.index.as_str()
        } else {
            rest.trim_start_matches('/')
        };

        let full_path =
            join_bounded(&self.root, relative, self.max_path_len).map_err(|_| StatusCode::UriTooLong)?;

        let metadata = std::fs::metadata(&full_path).map_err(|_| StatusCode::NotFound)?;

        if metadata.is_dir() {
            return Err(StatusCode::Forbidden);
        }

        if !is_readable(&full_path) {
            return Err(StatusCode::Forbidden);
        }

        if metadata.len() > self.max_file_size {
            return Err(StatusCode::Forbidden);
        }

        // stat/open race: the file may be gone by now
        let file = File::open(&full_path).map_err(|_| StatusCode::NotFound)?;

        Ok(ResolvedFile {
            file,
            content_type: mime::content_type_for(&full_path),
            size: metadata.len(),
            path: full_path,
        })
    }
}

fn is_readable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK) == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_bounded_rejects_at_capacity() {
        let root = Path::new("./static");
        assert!(join_bounded(root, "index.html", 64).is_ok());

        let long = "a".repeat(55);
        let err = join_bounded(root, &long, 64).unwrap_err();
        assert_eq!(err.len, 64);
    }
}

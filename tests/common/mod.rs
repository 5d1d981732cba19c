#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::path::Path;

use staticd::http::handler::Handler;
use staticd::logging::AccessLog;
use staticd::static_files::StaticFiles;
use tempfile::TempDir;

/// Exactly 37 bytes.
pub const INDEX_HTML: &[u8] = b"<html><body>Hello world</body></html>";

pub fn static_root() -> TempDir {
    assert_eq!(INDEX_HTML.len(), 37);
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("big.bin"), big_file_contents()).unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    dir
}

/// 100 000 bytes that do not repeat with any small period.
pub fn big_file_contents() -> Vec<u8> {
    (0..100_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect()
}

pub fn handler(root: &Path) -> Handler {
    Handler::new(StaticFiles::new(root, "index.html"), AccessLog::disabled())
}

/// In-memory socket with scripted reads and throttled writes.
pub struct MockStream {
    incoming: VecDeque<Vec<u8>>,
    eof: bool,
    pub written: Vec<u8>,
    /// Most bytes a single write accepts
    pub write_limit: usize,
    /// Every `n`th write reports `WouldBlock`
    pub block_every: Option<usize>,
    pub broken: bool,
    /// Writes past this count fail with `BrokenPipe`
    pub fail_after: Option<usize>,
    writes: usize,
}

impl MockStream {
    pub fn new() -> Self {
        Self {
            incoming: VecDeque::new(),
            eof: false,
            written: Vec::new(),
            write_limit: usize::MAX,
            block_every: None,
            broken: false,
            fail_after: None,
            writes: 0,
        }
    }

    pub fn with_input(input: &[u8]) -> Self {
        let mut stream = Self::new();
        stream.feed(input);
        stream
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.incoming.push_back(bytes.to_vec());
    }

    pub fn close_input(&mut self) {
        self.eof = true;
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.incoming.pop_front() {
            Some(mut chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.incoming.push_front(chunk.split_off(n));
                }
                Ok(n)
            }
            None if self.eof => Ok(0),
            None => Err(io::ErrorKind::WouldBlock.into()),
        }
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.broken || self.fail_after.is_some_and(|limit| self.writes >= limit) {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.writes += 1;
        if let Some(every) = self.block_every {
            if self.writes % every == 0 {
                return Err(io::ErrorKind::WouldBlock.into());
            }
        }
        let n = buf.len().min(self.write_limit);
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Splits raw response bytes into the header block and the body.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator in response");
    let head = String::from_utf8(raw[..end + 4].to_vec()).unwrap();
    (head, raw[end + 4..].to_vec())
}

pub fn content_length(head: &str) -> u64 {
    head.lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .expect("no Content-Length header")
        .trim()
        .parse()
        .unwrap()
}

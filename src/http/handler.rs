use std::fs::File;
use std::io::{self, Write};
use std::os::unix::fs::FileExt;

use crate::http::parser::parse_request_line;
use crate::http::request::Method;
use crate::http::response::{Response, ResponseHead, StatusCode};
use crate::http::writer::{HeadOverflow, ResponseWriter};
use crate::logging::AccessLog;
use crate::static_files::StaticFiles;

/// A file body being streamed to the client.
///
/// Each chunk is read at offset `sent`, so bytes the socket refused are read
/// again on the next attempt instead of being lost.
#[derive(Debug)]
pub struct FileTransfer {
    file: File,
    size: u64,
    sent: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkProgress {
    /// `n` more bytes were accepted by the socket
    Sent(usize),
    /// The socket accepted nothing this time
    WouldBlock,
}

impl FileTransfer {
    pub fn new(file: File, size: u64) -> Self {
        Self { file, size, sent: 0 }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.sent
    }

    pub fn remaining(&self) -> u64 {
        self.size - self.sent
    }

    pub fn is_complete(&self) -> bool {
        self.sent >= self.size
    }

    /// Reads at most `scratch.len()` bytes from the file and offers them to
    /// `stream` in one write.
    pub fn send_chunk<W: Write>(&mut self, stream: &mut W, scratch: &mut [u8]) -> io::Result<ChunkProgress> {
        if self.is_complete() {
            return Ok(ChunkProgress::Sent(0));
        }

        let want = scratch.len().min(usize::try_from(self.remaining()).unwrap_or(usize::MAX));
        let read = self.file.read_at(&mut scratch[..want], self.sent)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file shrank during transfer",
            ));
        }

        match stream.write(&scratch[..read]) {
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "connection closed while writing",
            )),
            Ok(n) => {
                self.sent += n as u64;
                Ok(ChunkProgress::Sent(n))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ChunkProgress::WouldBlock),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ChunkProgress::WouldBlock),
            Err(e) => Err(e),
        }
    }
}

/// Outcome of handling one request: the queued header block (plus any error
/// body) and, for a GET that resolved to a file, the body to stream.
#[derive(Debug)]
pub struct Dispatch {
    pub status: StatusCode,
    pub writer: ResponseWriter,
    pub body: Option<FileTransfer>,
}

/// Turns a complete header block into a response.
#[derive(Debug, Clone)]
pub struct Handler {
    files: StaticFiles,
    access_log: AccessLog,
}

impl Handler {
    pub fn new(files: StaticFiles, access_log: AccessLog) -> Self {
        Self { files, access_log }
    }

    pub fn access_log(&self) -> &AccessLog {
        &self.access_log
    }

    /// Handles the header block `head` (terminator excluded).
    ///
    /// Opens the file when one is served and writes exactly one access-log
    /// entry. Never fails: every outcome is an HTTP response.
    pub fn handle(&self, head: &[u8]) -> Dispatch {
        let request = match parse_request_line(head) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = ?e, "Failed to parse request line");
                return self.reject("-", "-", StatusCode::BadRequest, false);
            }
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            version = %request.version,
            "Request received"
        );

        let method = match request.supported_method() {
            Some(method) => method,
            None => {
                return self.reject(&request.method, &request.path, StatusCode::MethodNotAllowed, false);
            }
        };
        let is_head = method == Method::HEAD;

        let resolved = match self.files.resolve(&request.path) {
            Ok(resolved) => resolved,
            Err(status) => return self.reject(&request.method, &request.path, status, is_head),
        };

        let response_head = ResponseHead::new(StatusCode::Ok, resolved.content_type, resolved.size);
        let writer = match ResponseWriter::new(&response_head, None) {
            Ok(writer) => writer,
            Err(overflow) => return self.head_overflow(&request.method, &request.path, overflow),
        };

        tracing::debug!(
            file = %resolved.path.display(),
            size = resolved.size,
            "Serving file"
        );

        let body = if is_head {
            drop(resolved.file);
            None
        } else {
            Some(FileTransfer::new(resolved.file, resolved.size))
        };

        self.access_log.request(&request.method, &request.path, StatusCode::Ok.as_u16());

        Dispatch {
            status: StatusCode::Ok,
            writer,
            body,
        }
    }

    fn reject(&self, method: &str, path: &str, status: StatusCode, is_head: bool) -> Dispatch {
        let response = Response::error(status);
        let body = if is_head { None } else { Some(response.body.as_slice()) };

        let writer = match ResponseWriter::new(&response.head, body) {
            Ok(writer) => writer,
            Err(overflow) => return self.head_overflow(method, path, overflow),
        };

        self.access_log.request(method, path, status.as_u16());

        Dispatch {
            status,
            writer,
            body: None,
        }
    }

    /// Closes without a response; the connection has nothing it could send.
    fn head_overflow(&self, method: &str, path: &str, overflow: HeadOverflow) -> Dispatch {
        tracing::error!(needed = overflow.needed, "Response header block overflow");
        self.access_log.request(method, path, StatusCode::BadRequest.as_u16());

        Dispatch {
            status: StatusCode::BadRequest,
            writer: ResponseWriter::empty(),
            body: None,
        }
    }
}

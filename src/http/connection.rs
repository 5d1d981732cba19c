use std::io::{self, Read, Write};

use crate::http::handler::{ChunkProgress, FileTransfer, Handler};
use crate::http::parser::find_headers_end;
use crate::http::writer::{ResponseWriter, WriteProgress};

/// Fixed-capacity inbound buffer.
///
/// Bytes accumulate until a header block is complete; consuming a block
/// shifts whatever follows it to the front.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: Box<[u8]>,
    len: usize,
}

impl ReadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// One read from `src` into the unused tail. `Ok(0)` means the peer
    /// closed.
    pub fn read_from<R: Read>(&mut self, src: &mut R) -> io::Result<usize> {
        let n = src.read(&mut self.buf[self.len..])?;
        self.len += n;
        Ok(n)
    }

    /// Drops the first `n` bytes, keeping the rest at the front.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.buf.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Waiting for `\r\n\r\n`
    ReadingHeaders,
    /// A response without a file body is being written
    SendingHeadersOnly,
    /// The header block is queued or sent and the file follows
    StreamingBody,
    /// Nothing more will happen; the owner must tear the connection down
    Closed,
}

/// Readiness a connection wants from the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub read: bool,
    pub write: bool,
}

impl Interest {
    pub const READ: Interest = Interest {
        read: true,
        write: false,
    };
    pub const READ_WRITE: Interest = Interest {
        read: true,
        write: true,
    };
}

/// Per-client state, advanced one readiness event at a time.
///
/// Only its owning worker ever touches a connection. Dropping it closes the
/// socket and any open file.
pub struct Connection<S> {
    stream: S,
    buffer: ReadBuffer,
    state: ConnState,
    writer: Option<ResponseWriter>,
    transfer: Option<FileTransfer>,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, buffer_capacity: usize) -> Self {
        Self {
            stream,
            buffer: ReadBuffer::with_capacity(buffer_capacity),
            state: ConnState::ReadingHeaders,
            writer: None,
            transfer: None,
        }
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state != ConnState::Closed
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn buffered(&self) -> &[u8] {
        self.buffer.filled()
    }

    pub fn transfer(&self) -> Option<&FileTransfer> {
        self.transfer.as_ref()
    }

    /// Always read; write only while response bytes or file bytes remain.
    pub fn interest(&self) -> Interest {
        let pending_head = self.writer.as_ref().is_some_and(|w| !w.is_complete());
        let pending_body = self.transfer.as_ref().is_some_and(|t| !t.is_complete());
        if pending_head || pending_body {
            Interest::READ_WRITE
        } else {
            Interest::READ
        }
    }

    /// Readability: one bounded read, then dispatch if a header block just
    /// completed.
    pub fn on_readable(&mut self, handler: &Handler) {
        if !self.is_alive() {
            return;
        }

        if self.buffer.is_full() {
            tracing::debug!(state = ?self.state, "Read buffer full, closing");
            self.close();
            return;
        }

        match self.buffer.read_from(&mut self.stream) {
            Ok(0) => {
                tracing::debug!("Client disconnected");
                self.close();
                return;
            }
            Ok(_) => {}
            Err(e) if is_transient(&e) => return,
            Err(e) => {
                tracing::debug!(error = %e, "Read failed");
                self.close();
                return;
            }
        }

        if self.state != ConnState::ReadingHeaders {
            // one request per connection; later bytes only stay buffered
            return;
        }

        let Some(headers_end) = find_headers_end(self.buffer.filled()) else {
            return;
        };

        let dispatch = handler.handle(&self.buffer.filled()[..headers_end]);
        self.buffer.consume(headers_end + 4);

        self.state = if dispatch.body.is_some() {
            ConnState::StreamingBody
        } else {
            ConnState::SendingHeadersOnly
        };
        self.writer = Some(dispatch.writer);
        self.transfer = dispatch.body;

        self.flush_head();
        self.settle();
    }

    /// Writability: finish the header block, then one file chunk.
    pub fn on_writable(&mut self, scratch: &mut [u8]) {
        if !self.is_alive() {
            return;
        }

        if !self.flush_head() {
            self.settle();
            return;
        }

        if let Some(transfer) = self.transfer.as_mut() {
            match transfer.send_chunk(&mut self.stream, scratch) {
                Ok(ChunkProgress::Sent(_)) | Ok(ChunkProgress::WouldBlock) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "Body write failed");
                    self.close();
                    return;
                }
            }
        }

        self.settle();
    }

    /// Tears down what the connection owns except the socket itself.
    pub fn close(&mut self) {
        self.transfer = None;
        self.writer = None;
        self.state = ConnState::Closed;
    }

    /// Writes queued header bytes. Returns true once none remain.
    fn flush_head(&mut self) -> bool {
        let Some(writer) = self.writer.as_mut() else {
            return true;
        };

        match writer.write_to(&mut self.stream) {
            Ok(WriteProgress::Complete) => true,
            Ok(WriteProgress::Pending) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Header write failed");
                self.close();
                false
            }
        }
    }

    /// Closes the connection once its response is fully written.
    fn settle(&mut self) {
        if matches!(self.state, ConnState::ReadingHeaders | ConnState::Closed) {
            return;
        }

        let head_done = self.writer.as_ref().is_none_or(|w| w.is_complete());
        let body_done = self.transfer.as_ref().is_none_or(|t| t.is_complete());

        if head_done && body_done {
            self.close();
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

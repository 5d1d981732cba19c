use std::io::{self, Write};

use bytes::{Buf, BytesMut};

use crate::config::HEADER_CAPACITY;
use crate::http::response::{ResponseHead, SERVER_NAME};

const HTTP_VERSION: &str = "HTTP/1.1";

/// The serialized header block would not fit in [`HEADER_CAPACITY`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadOverflow {
    pub needed: usize,
}

/// Renders the status line and fixed header set.
pub fn serialize_head(head: &ResponseHead) -> Result<BytesMut, HeadOverflow> {
    let rendered = format!(
        "{} {} {}\r\n\
         Server: {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase(),
        SERVER_NAME,
        head.content_type,
        head.content_length,
    );

    if rendered.len() > HEADER_CAPACITY {
        return Err(HeadOverflow {
            needed: rendered.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(HEADER_CAPACITY);
    buf.extend_from_slice(rendered.as_bytes());
    Ok(buf)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteProgress {
    /// Every queued byte has been accepted by the socket
    Complete,
    /// Bytes remain; retry on the next writability event
    Pending,
}

/// Outbound bytes of a response that is not streamed from a file: the header
/// block, optionally followed by an in-memory body.
#[derive(Debug)]
pub struct ResponseWriter {
    buffer: BytesMut,
}

impl ResponseWriter {
    pub fn new(head: &ResponseHead, body: Option<&[u8]>) -> Result<Self, HeadOverflow> {
        let mut buffer = serialize_head(head)?;
        if let Some(body) = body {
            buffer.extend_from_slice(body);
        }
        Ok(Self { buffer })
    }

    /// A writer with nothing queued.
    pub fn empty() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_complete(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Hands everything still queued to `stream` in a single write call.
    ///
    /// A short write or `WouldBlock` leaves the rest queued. A zero-length
    /// write on a non-empty queue means the peer is gone.
    pub fn write_to<W: Write>(&mut self, stream: &mut W) -> io::Result<WriteProgress> {
        if self.buffer.is_empty() {
            return Ok(WriteProgress::Complete);
        }

        match stream.write(&self.buffer) {
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "connection closed while writing",
            )),
            Ok(n) => {
                self.buffer.advance(n);
                if self.buffer.is_empty() {
                    Ok(WriteProgress::Complete)
                } else {
                    Ok(WriteProgress::Pending)
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(WriteProgress::Pending),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(WriteProgress::Pending),
            Err(e) => Err(e),
        }
    }
}

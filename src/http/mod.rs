//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.x to serve files: one request per connection, GET and
//! HEAD only, every response ends with the connection closing.
//!
//! # Architecture
//!
//! - **`connection`**: Per-client state machine driven by readiness events
//! - **`parser`**: Finds the end of a header block and tokenizes the request line
//! - **`request`**: Request line representation and supported methods
//! - **`handler`**: Maps a request onto a response and an optional file body
//! - **`response`**: Status codes, reason phrases and error pages
//! - **`writer`**: Serializes header blocks and writes them without blocking
//! - **`mime`**: Content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  ReadingHeaders  │ ← Accumulate bytes until \r\n\r\n
//!        └────────┬─────────┘
//!                 │ Header block complete, handled in the same step
//!        ┌────────┴───────────────┐
//!        ▼                        ▼
//!  ┌────────────────────┐  ┌───────────────┐
//!  │ SendingHeadersOnly │  │ StreamingBody │ ← One file chunk per writable event
//!  └─────────┬──────────┘  └───────┬───────┘
//!            │ All bytes written   │
//!            └──────────┬──────────┘
//!                       ▼
//!                 ┌──────────┐
//!                 │  Closed  │ ← Also reached on EOF or any I/O error
//!                 └──────────┘
//! ```

pub mod connection;
pub mod handler;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

use crate::config::MAX_PATH_LENGTH;
use crate::http::request::Request;

/// Longest accepted method token.
pub const MAX_METHOD_LEN: usize = 15;
/// Longest accepted protocol token.
pub const MAX_VERSION_LEN: usize = 15;
/// Longest accepted request path.
pub const MAX_TARGET_LEN: usize = MAX_PATH_LENGTH - 1;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not valid UTF-8
    InvalidRequest,
    /// Fewer than three whitespace-separated tokens
    MissingToken,
    /// A token exceeds its size budget
    TokenTooLong,
    /// No `\r\n\r\n` in the buffer yet
    Incomplete,
}

/// Offset of the `\r\n\r\n` that ends the header block, if present.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    memchr::memmem::find(buf, HEADER_TERMINATOR)
}

/// Parses the request at the front of `buf`.
///
/// Returns the request line and the number of bytes the whole header block
/// occupies, terminator included. Bytes past that offset belong to whatever
/// the client sends next.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let request = parse_request_line(&buf[..headers_end])?;
    Ok((request, headers_end + HEADER_TERMINATOR.len()))
}

/// Tokenizes the first line of a header block into method, path and
/// protocol. Any further tokens and all header lines are ignored.
pub fn parse_request_line(head: &[u8]) -> Result<Request, ParseError> {
    let line_end = memchr::memmem::find(head, b"\r\n").unwrap_or(head.len());
    let line = std::str::from_utf8(&head[..line_end]).map_err(|_| ParseError::InvalidRequest)?;

    let mut parts = line.split_whitespace();

    let method = bounded_token(parts.next(), MAX_METHOD_LEN)?;
    let path = bounded_token(parts.next(), MAX_TARGET_LEN)?;
    let version = bounded_token(parts.next(), MAX_VERSION_LEN)?;

    Ok(Request {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
    })
}

fn bounded_token(token: Option<&str>, max: usize) -> Result<&str, ParseError> {
    let token = token.ok_or(ParseError::MissingToken)?;
    if token.len() > max {
        return Err(ParseError::TokenTooLong);
    }
    Ok(token)
}

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "Static File Server";

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Malformed request line
/// - `Forbidden` (403): Traversal attempt, directory, unreadable or oversized file
/// - `NotFound` (404): No such file, or it could not be opened
/// - `MethodNotAllowed` (405): Method other than GET/HEAD
/// - `UriTooLong` (414): Path exceeds the path length budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 414 URI Too Long
    UriTooLong,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::UriTooLong.as_u16(), 414);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::UriTooLong => 414,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        reason_phrase(self.as_u16())
    }
}

/// Reason phrase for a numeric status; codes outside the table read
/// "Unknown".
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        414 => "URI Too Long",
        _ => "Unknown",
    }
}

/// Everything needed to render a response header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub content_length: u64,
}

impl ResponseHead {
    pub fn new(status: StatusCode, content_type: &'static str, content_length: u64) -> Self {
        Self {
            status,
            content_type,
            content_length,
        }
    }
}

/// A complete response held in memory: header fields plus body.
///
/// Only error responses are built this way; file bodies stream from disk.
#[derive(Debug)]
pub struct Response {
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

impl Response {
    /// Error page for `status`, with a small HTML body whose length becomes
    /// the Content-Length.
    pub fn error(status: StatusCode) -> Self {
        let code = status.as_u16();
        let reason = status.reason_phrase();
        let body = format!(
            "<html><head><title>{code} {reason}</title></head>\
             <body><h1>{code} {reason}</h1></body></html>"
        )
        .into_bytes();

        Self {
            head: ResponseHead::new(status, "text/html", body.len() as u64),
            body,
        }
    }
}

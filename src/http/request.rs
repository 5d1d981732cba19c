/// HTTP request methods the server serves.
///
/// Every other method token is carried as raw text in [`Request::method`] and
/// answered with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

impl Method {
    /// Parses a supported method token.
    ///
    /// Matching is case-sensitive:
    ///
    /// ```
    /// # use staticd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("DELETE"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }
}

/// The request line of a client request.
///
/// Header lines after the request line are not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method token exactly as sent (e.g. "GET", "DELETE")
    pub method: String,
    /// The request target (e.g. "/index.html")
    pub path: String,
    /// Protocol token (typically "HTTP/1.1")
    pub version: String,
}

impl Request {
    /// The supported method, or `None` when the request must be refused
    /// with 405.
    pub fn supported_method(&self) -> Option<Method> {
        Method::from_str(&self.method)
    }

    pub fn is_head(&self) -> bool {
        self.supported_method() == Some(Method::HEAD)
    }
}

use std::fmt;

/// HTTP request methods.
///
/// Any method token is accepted by the parser; only GET and HEAD are served,
/// everything else is answered with 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// Any other token, kept verbatim
    Other(String),
}

impl Method {
    /// Parses a method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::Other(s) => s,
        }
    }

    /// Whether the server knows how to answer this method.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed request line plus the header state that matters to the server.
///
/// Header values other than `Connection` and `Content-Length` are validated
/// for framing and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The raw request path, exactly as received
    pub path: String,
    /// A `Connection` header has been seen
    pub seen_connection: bool,
    /// A `Content-Length` header has been seen
    pub seen_content_length: bool,
    /// The client asked for `Connection: close`
    pub close: bool,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            seen_connection: false,
            seen_content_length: false,
            close: false,
        }
    }

    /// Whether the response to this request carries a body.
    pub fn wants_body(&self) -> bool {
        self.method == Method::GET
    }
}

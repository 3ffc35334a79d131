use tokio::fs::File;

/// HTTP status codes the server produces.
///
/// - `Ok` (200): file served
/// - `Found` (302): redirect to another server
/// - `BadRequest` (400): malformed request
/// - `NotFound` (404): no such resource, or the path was rejected
/// - `InternalServerError` (500): stream failure
/// - `NotImplemented` (501): method other than GET/HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Whether the connection must be closed after sending this status.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StatusCode::BadRequest | StatusCode::InternalServerError)
    }
}

/// One of the three response shapes the server sends.
#[derive(Debug)]
pub enum Response {
    /// 302 with a `Location` header and no body.
    Redirect(String),
    /// 200 with `Content-Type: application/octet-stream`.
    ///
    /// `None` means the resource is known to exist but could not be opened;
    /// it is sent with a zero length.
    File {
        file: Option<File>,
        head_only: bool,
    },
    /// Bare status line, optionally with `Connection: close`.
    Status { status: StatusCode, close: bool },
}

impl Response {
    pub fn status(&self) -> StatusCode {
        match self {
            Response::Redirect(_) => StatusCode::Found,
            Response::File { .. } => StatusCode::Ok,
            Response::Status { status, .. } => *status,
        }
    }

    pub fn not_found() -> Self {
        Response::Status {
            status: StatusCode::NotFound,
            close: false,
        }
    }

    pub fn not_implemented() -> Self {
        Response::Status {
            status: StatusCode::NotImplemented,
            close: false,
        }
    }

    /// Status response that tears the connection down afterwards.
    pub fn closing(status: StatusCode) -> Self {
        Response::Status {
            status,
            close: true,
        }
    }

    pub fn internal_error() -> Self {
        Self::closing(StatusCode::InternalServerError)
    }
}

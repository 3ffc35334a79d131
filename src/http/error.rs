//! Request parsing errors.

use std::fmt;

use crate::http::response::StatusCode;

/// Why a request could not be parsed.
///
/// Every variant is fatal for the connection. [`ParseError::Io`] is a stream
/// failure and maps to 500; all others are protocol violations and map to 400.
#[derive(Debug)]
pub enum ParseError {
    /// Reading from the socket failed or timed out.
    Io(std::io::Error),
    /// The peer closed the connection in the middle of a request.
    UnexpectedEof,
    /// A byte that is not allowed inside the current token.
    InvalidCharacter,
    /// The version token was not `HTTP/1.1`.
    InvalidVersion,
    /// A CR was not followed by LF.
    MissingLineFeed,
    /// A header line ended in a bare LF.
    MissingCarriageReturn,
    /// A header line started with `:`.
    EmptyHeaderName,
    /// `Connection` or `Content-Length` appeared twice.
    DuplicateHeader(&'static str),
    /// `Connection` was neither `close` nor `keep-alive`.
    InvalidConnection,
    /// `Content-Length` was empty or not all zeros.
    InvalidContentLength,
}

impl ParseError {
    /// The status code sent back before the connection is closed.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::Io(_) => StatusCode::InternalServerError,
            _ => StatusCode::BadRequest,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "io: {}", e),
            ParseError::UnexpectedEof => f.write_str("connection closed mid-request"),
            ParseError::InvalidCharacter => f.write_str("invalid character in request"),
            ParseError::InvalidVersion => f.write_str("unsupported HTTP version"),
            ParseError::MissingLineFeed => f.write_str("CR not followed by LF"),
            ParseError::MissingCarriageReturn => f.write_str("header line not terminated by CRLF"),
            ParseError::EmptyHeaderName => f.write_str("empty header name"),
            ParseError::DuplicateHeader(name) => write!(f, "duplicate {} header", name),
            ParseError::InvalidConnection => f.write_str("invalid Connection header value"),
            ParseError::InvalidContentLength => f.write_str("unsupported Content-Length value"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

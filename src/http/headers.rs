//! Per-header policy applied while parsing.
//!
//! Only `Connection` and `Content-Length` are interpreted. Each may appear at
//! most once. Everything else is accepted and dropped.

use crate::http::error::ParseError;
use crate::http::request::Request;

/// Applies one header line to `request`.
///
/// `name` is compared case-insensitively; `value` must already be trimmed.
pub fn apply(request: &mut Request, name: &str, value: &str) -> Result<(), ParseError> {
    if name.eq_ignore_ascii_case("connection") {
        if request.seen_connection {
            return Err(ParseError::DuplicateHeader("Connection"));
        }
        request.seen_connection = true;

        if value.eq_ignore_ascii_case("close") {
            request.close = true;
        } else if !value.eq_ignore_ascii_case("keep-alive") {
            return Err(ParseError::InvalidConnection);
        }
    } else if name.eq_ignore_ascii_case("content-length") {
        if request.seen_content_length {
            return Err(ParseError::DuplicateHeader("Content-Length"));
        }
        request.seen_content_length = true;

        // Bodies are never read, so only a zero length is acceptable.
        if value.is_empty() || value.bytes().any(|b| b != b'0') {
            return Err(ParseError::InvalidContentLength);
        }
    }

    Ok(())
}

/// Strips the trailing CR from a raw header value and trims spaces.
pub fn clean_value(raw: &str) -> Result<&str, ParseError> {
    let value = raw
        .strip_suffix('\r')
        .ok_or(ParseError::MissingCarriageReturn)?;
    Ok(value.trim_matches(' '))
}

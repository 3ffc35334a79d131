//! Streaming HTTP/1.1 request parser.
//!
//! Parsing is a strict sequence with no backtracking:
//!
//! ```text
//! Method ─SP─▶ Path ─SP─▶ Version ─CRLF─▶ Header* ─CRLF─▶ done
//! ```
//!
//! Each step pulls bytes from a [`StreamReader`], so a request may arrive in
//! any number of socket reads. No body is ever read.

use tokio::io::AsyncRead;

use crate::http::error::ParseError;
use crate::http::headers;
use crate::http::request::{Method, Request};
use crate::http::scanner::read_token;
use crate::http::stream::StreamReader;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Parses the next request on the connection.
///
/// Returns `Ok(None)` if the peer closed the connection cleanly before
/// sending any byte of a new request.
pub async fn parse_request<R>(reader: &mut StreamReader<R>) -> Result<Option<Request>, ParseError>
where
    R: AsyncRead + Unpin,
{
    if !reader.fill().await? {
        return Ok(None);
    }

    let method = read_token(reader, b' ', false).await?;
    let path = read_token(reader, b' ', false).await?;

    let version = read_token(reader, b'\r', false).await?;
    if version != HTTP_VERSION {
        return Err(ParseError::InvalidVersion);
    }
    expect_line_feed(reader).await?;

    let mut request = Request::new(Method::parse(&method), path);

    loop {
        let next = reader.peek().await?.ok_or(ParseError::UnexpectedEof)?;
        if next == b'\r' {
            reader.consume(1);
            expect_line_feed(reader).await?;
            break;
        }

        let name = read_token(reader, b':', false).await?;
        if name.is_empty() {
            return Err(ParseError::EmptyHeaderName);
        }

        let raw = read_token(reader, b'\n', true).await?;
        let value = headers::clean_value(&raw)?;

        headers::apply(&mut request, &name, value)?;
    }

    Ok(Some(request))
}

async fn expect_line_feed<R>(reader: &mut StreamReader<R>) -> Result<(), ParseError>
where
    R: AsyncRead + Unpin,
{
    match reader.peek().await? {
        Some(b'\n') => {
            reader.consume(1);
            Ok(())
        }
        Some(_) => Err(ParseError::MissingLineFeed),
        None => Err(ParseError::UnexpectedEof),
    }
}

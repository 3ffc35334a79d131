//! Token scanning over the buffered region of a [`StreamReader`].
//!
//! A token is everything up to a delimiter byte. Tokens may span any number
//! of refills: [`read_token`] keeps appending and refilling until the
//! delimiter shows up or a forbidden byte is seen.

use tokio::io::AsyncRead;

use crate::http::error::ParseError;
use crate::http::stream::StreamReader;

/// Result of scanning one buffered region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// The delimiter sits at this offset.
    Found(usize),
    /// A forbidden byte was hit before the delimiter.
    Invalid,
    /// The whole region is token bytes; refill and keep going.
    Exhausted,
}

/// Scans `region` for `delimiter`, validating each byte before it.
pub fn scan(region: &[u8], delimiter: u8, allow_whitespace: bool) -> Scan {
    for (i, &b) in region.iter().enumerate() {
        if b == delimiter {
            return Scan::Found(i);
        }
        if !is_token_byte(b, allow_whitespace) {
            return Scan::Invalid;
        }
    }
    Scan::Exhausted
}

/// Whether `b` may appear inside a token.
///
/// NUL, non-ASCII bytes and non-whitespace control characters are never
/// allowed. Whitespace is allowed only when `allow_whitespace` is set.
pub fn is_token_byte(b: u8, allow_whitespace: bool) -> bool {
    if b == 0 || !b.is_ascii() {
        return false;
    }
    if is_space(b) {
        return allow_whitespace;
    }
    !b.is_ascii_control()
}

// C `isspace`: includes vertical tab, unlike `u8::is_ascii_whitespace`.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

// Tokens are not capped; crossing this size is only logged.
const LONG_TOKEN: usize = 8 * 1024;

/// Reads one token terminated by `delimiter`, consuming the delimiter.
///
/// Hitting end of stream before the delimiter is a truncated request.
pub async fn read_token<R>(
    reader: &mut StreamReader<R>,
    delimiter: u8,
    allow_whitespace: bool,
) -> Result<String, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut token = Vec::new();

    loop {
        if !reader.fill().await? {
            return Err(ParseError::UnexpectedEof);
        }

        match reader.scan(delimiter, allow_whitespace) {
            Scan::Found(n) => {
                reader.take_into(n, &mut token);
                reader.consume(1);
                break;
            }
            Scan::Invalid => return Err(ParseError::InvalidCharacter),
            Scan::Exhausted => {
                let before = token.len();
                let n = reader.remaining();
                reader.take_into(n, &mut token);
                if before < LONG_TOKEN && token.len() >= LONG_TOKEN {
                    tracing::debug!(len = token.len(), delimiter = ?char::from(delimiter), "Token still open after many bytes");
                }
            }
        }
    }

    // Every accepted byte is ASCII.
    String::from_utf8(token).map_err(|_| ParseError::InvalidCharacter)
}

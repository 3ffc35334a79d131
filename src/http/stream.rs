//! Bounded read buffer over a single socket.
//!
//! The reader owns at most `capacity` buffered bytes and only touches the
//! socket when every buffered byte has been consumed. Callers never see the
//! buffer itself; they scan it for a delimiter and consume what they used.

use std::io;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

use crate::http::error::ParseError;
use crate::http::scanner::{self, Scan};

/// Default buffer size for one refill.
pub const DEFAULT_CAPACITY: usize = 4096;

pub struct StreamReader<R> {
    inner: R,
    buf: BytesMut,
    capacity: usize,
    read_timeout: Option<Duration>,
}

impl<R> StreamReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// A zero capacity is bumped to one byte.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buf: BytesMut::with_capacity(capacity),
            capacity,
            read_timeout: None,
        }
    }

    /// Bounds every socket read. An elapsed deadline surfaces as
    /// [`ParseError::Io`] with [`io::ErrorKind::TimedOut`].
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes buffered and not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Makes sure at least one byte is buffered.
    ///
    /// Refills only when the buffer is empty. Returns `Ok(false)` when the
    /// peer has closed the stream.
    pub async fn fill(&mut self) -> Result<bool, ParseError> {
        if self.buf.is_empty() {
            self.refill().await?;
        }
        Ok(!self.buf.is_empty())
    }

    /// The next unconsumed byte, refilling if needed. `None` at end of stream.
    pub async fn peek(&mut self) -> Result<Option<u8>, ParseError> {
        if !self.fill().await? {
            return Ok(None);
        }
        Ok(self.buf.first().copied())
    }

    /// Scans the buffered region only; never touches the socket.
    pub fn scan(&self, delimiter: u8, allow_whitespace: bool) -> Scan {
        scanner::scan(&self.buf, delimiter, allow_whitespace)
    }

    /// Drops `n` buffered bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`remaining`](Self::remaining).
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.buf.len(), "consume past end of buffer");
        self.buf.advance(n);
    }

    /// Appends `n` buffered bytes to `out` and consumes them.
    pub fn take_into(&mut self, n: usize, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.buf[..n]);
        self.consume(n);
    }

    async fn refill(&mut self) -> io::Result<usize> {
        self.buf.clear();
        self.buf.resize(self.capacity, 0);

        let read = self.inner.read(&mut self.buf[..]);
        let result = match self.read_timeout {
            Some(limit) => match timeout(limit, read).await {
                Ok(r) => r,
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out")),
            },
            None => read.await,
        };

        match result {
            Ok(n) => {
                self.buf.truncate(n);
                Ok(n)
            }
            Err(e) => {
                self.buf.clear();
                Err(e)
            }
        }
    }
}

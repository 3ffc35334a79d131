use std::io::{self, SeekFrom};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";
const OCTET_STREAM: &str = "application/octet-stream";

/// Chunk size for streaming file bodies
const BODY_CHUNK: usize = 8192;

fn serialize_head(status: StatusCode, headers: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response with full-delivery semantics: short writes are
/// retried until every byte is out.
pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    body: Option<(File, u64)>,
    write_timeout: Option<Duration>,
}

impl ResponseWriter {
    /// Frames `response`. File lengths are measured here, by seeking to the
    /// end and back, so the head is complete before anything is sent.
    pub async fn new(response: Response) -> io::Result<Self> {
        let (head, body) = match response {
            Response::Redirect(location) => (
                serialize_head(StatusCode::Found, &[("Location", location.as_str())]),
                None,
            ),

            Response::File { file, head_only } => {
                let (file, len) = match file {
                    Some(mut f) => {
                        let len = f.seek(SeekFrom::End(0)).await?;
                        f.seek(SeekFrom::Start(0)).await?;
                        (Some(f), len)
                    }
                    None => (None, 0),
                };

                let len_str = len.to_string();
                let head = serialize_head(
                    StatusCode::Ok,
                    &[("Content-Type", OCTET_STREAM), ("Content-Length", &len_str)],
                );

                let body = if head_only { None } else { file.map(|f| (f, len)) };
                (head, body)
            }

            Response::Status { status, close } => {
                let headers: &[(&str, &str)] = if close { &[("Connection", "close")] } else { &[] };
                (serialize_head(status, headers), None)
            }
        };

        Ok(Self {
            head,
            written: 0,
            body,
            write_timeout: None,
        })
    }

    pub fn with_write_timeout(mut self, write_timeout: Option<Duration>) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// The serialized status line and headers.
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = write_some(stream, &self.head[self.written..], self.write_timeout).await?;
            self.written += n;
        }

        if let Some((file, len)) = &mut self.body {
            let mut chunk = vec![0u8; BODY_CHUNK];
            let mut sent: u64 = 0;

            while sent < *len {
                let want = (*len - sent).min(BODY_CHUNK as u64) as usize;
                let n = file.read(&mut chunk[..want]).await?;
                if n == 0 {
                    return Err(anyhow::anyhow!("file truncated while sending"));
                }

                let mut off = 0;
                while off < n {
                    off += write_some(stream, &chunk[off..n], self.write_timeout).await?;
                }
                sent += n as u64;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}

async fn write_some<W>(stream: &mut W, buf: &[u8], limit: Option<Duration>) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let n = match limit {
        Some(limit) => timeout(limit, stream.write(buf))
            .await
            .map_err(|_| anyhow::anyhow!("write timed out"))??,
        None => stream.write(buf).await?,
    };

    if n == 0 {
        return Err(anyhow::anyhow!("connection closed while writing"));
    }

    Ok(n)
}

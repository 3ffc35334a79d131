use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

use crate::config::Config;
use crate::http::dispatch;
use crate::http::error::ParseError;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::stream::{DEFAULT_CAPACITY, StreamReader};
use crate::http::writer::ResponseWriter;
use crate::server::shutdown::Shutdown;
use crate::site::Site;

/// Per-connection tuning taken from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub buffer_capacity: usize,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ConnectionSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            buffer_capacity: cfg.buffer_capacity,
            read_timeout: cfg.read_timeout(),
            write_timeout: cfg.write_timeout(),
        }
    }
}

/// Serves every request on one client stream, in order, until it closes.
pub struct Connection<S> {
    reader: StreamReader<ReadHalf<S>>,
    sink: WriteHalf<S>,
    site: Arc<Site>,
    shutdown: Shutdown,
    write_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>, settings: ConnectionSettings, shutdown: Shutdown) -> Self {
        let (read_half, sink) = tokio::io::split(stream);
        let reader = StreamReader::with_capacity(read_half, settings.buffer_capacity)
            .with_read_timeout(settings.read_timeout);

        Self {
            reader,
            sink,
            site,
            shutdown,
            write_timeout: settings.write_timeout,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = self.read_next().await?;
                }

                ConnectionState::Processing(req) => {
                    let response = dispatch::respond(&self.site, req).await;
                    let keep_alive = dispatch::keep_alive(req, &response);

                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status().as_u16(),
                        keep_alive,
                        "Request served"
                    );

                    self.state = self.prepare(response, keep_alive).await?;
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.sink).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    let _ = self.sink.shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_next(&mut self) -> anyhow::Result<ConnectionState> {
        let parsed = tokio::select! {
            biased;

            _ = self.shutdown.recv() => {
                tracing::info!("Shutdown while awaiting request, closing connection");
                return self.prepare(Response::internal_error(), false).await;
            }

            parsed = parse_request(&mut self.reader) => parsed,
        };

        match parsed {
            Ok(Some(req)) => Ok(ConnectionState::Processing(req)),
            Ok(None) => {
                tracing::debug!("Client closed connection");
                Ok(ConnectionState::Closed)
            }
            Err(e) => {
                let response = dispatch::reject(&e);
                let status = response.status().as_u16();
                if let ParseError::Io(_) = e {
                    tracing::warn!(status, error = %e, "Stream error while reading request");
                } else {
                    tracing::debug!(status, error = %e, "Malformed request");
                }
                self.prepare(response, false).await
            }
        }
    }

    /// Frames `response`, falling back to a closing 500 if the file cannot
    /// be measured.
    async fn prepare(&self, response: Response, keep_alive: bool) -> anyhow::Result<ConnectionState> {
        let state = match ResponseWriter::new(response).await {
            Ok(writer) => ConnectionState::Writing(writer.with_write_timeout(self.write_timeout), keep_alive),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare response");
                let writer = ResponseWriter::new(Response::internal_error()).await?;
                ConnectionState::Writing(writer.with_write_timeout(self.write_timeout), false)
            }
        };
        Ok(state)
    }
}

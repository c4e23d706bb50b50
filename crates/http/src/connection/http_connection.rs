use std::any::Any;
use std::io;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::connection::request_reader::{DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_REQUEST_SIZE};
use crate::connection::{RequestReader, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, SendError};

/// Limits applied while reading a request from a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub initial_buffer_size: usize,
    pub max_request_size: usize,
    /// Upper bound on the time spent assembling the request, `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            initial_buffer_size: DEFAULT_INITIAL_BUFFER_SIZE,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            read_timeout: None,
        }
    }
}

/// A single-request HTTP connection
///
/// `HttpConnection` handles the full lifecycle of a connection:
/// - Reading and assembling exactly one request
/// - Invoking the handler with a [`ResponseWriter`] bound to the connection
/// - Containing handler errors and panics
/// - Shutting the connection down, whatever happened before
///
/// The handler is never invoked for a request that failed to parse.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: W,
    read_timeout: Option<Duration>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        Self {
            reader: RequestReader::with_capacity(reader, config.initial_buffer_size, config.max_request_size),
            writer,
            read_timeout: config.read_timeout,
        }
    }

    pub async fn process<H>(self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<W> + ?Sized,
    {
        let Self { mut reader, mut writer, read_timeout } = self;

        let request = match read_request(&mut reader, read_timeout).await {
            Ok(request) => request,
            Err(e) => {
                debug!(cause = %e, "can't receive request, close connection");
                if let Err(shutdown_error) = writer.shutdown().await {
                    debug!(cause = %shutdown_error, "shutdown after parse failure");
                }
                return Err(e.into());
            }
        };

        info!(method = request.method(), path = request.target(), body_size = request.body().len(), "received request");

        let mut response_writer = ResponseWriter::new(writer);
        let outcome = AssertUnwindSafe(handler.call(&mut response_writer, request)).catch_unwind().await;

        let mut writer = response_writer.into_inner();
        let shutdown = writer.shutdown().await;

        match outcome {
            Ok(Ok(())) => shutdown.map_err(|e| SendError::io(e).into()),
            Ok(Err(e)) => {
                error!(cause = %e, "handler returned error");
                Err(HttpError::handler(e))
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(cause = %message, "panic in handler");
                Err(HttpError::handler_panic(message))
            }
        }
    }
}

async fn read_request<R>(reader: &mut RequestReader<R>, read_timeout: Option<Duration>) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    match read_timeout {
        Some(duration) => tokio::time::timeout(duration, reader.read_request())
            .await
            .map_err(|elapsed| ParseError::io(io::Error::new(io::ErrorKind::TimedOut, elapsed)))?,
        None => reader.read_request().await,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::connection::{ConnectionConfig, HttpConnection};
use crate::handler::Handler;
use crate::protocol::HttpError;
use crate::server::{ServerBuildError, ServerBuilder};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid server config: {source}")]
    Build {
        #[from]
        source: ServerBuildError,
    },

    #[error("bind server error: {source}")]
    Bind { source: io::Error },

    #[error("accept loop terminated abnormally: {source}")]
    Shutdown {
        #[from]
        source: JoinError,
    },
}

/// A configured, not yet listening server.
#[derive(Debug)]
pub struct Server {
    address: Vec<SocketAddr>,
    config: ConnectionConfig,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub(crate) fn new(address: Vec<SocketAddr>, config: ConnectionConfig) -> Self {
        Self { address, config }
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Binds the listening socket and starts accepting connections in the background.
    ///
    /// Returns once the socket is bound; the returned handle stops the server.
    pub async fn start<H>(self, handler: H) -> Result<ServerHandle, ServerError>
    where
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let listener = TcpListener::bind(self.address.as_slice()).await.map_err(|source| ServerError::Bind { source })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { source })?;
        info!(%local_addr, "start listening");

        let shutdown = Arc::new(Shutdown::default());
        let accept_task = tokio::spawn(accept_loop(listener, Arc::new(handler), Arc::clone(&shutdown), self.config));

        Ok(ServerHandle { local_addr, shutdown, accept_task })
    }
}

/// Binds `0.0.0.0:<port>` with the default configuration and starts serving `handler`.
pub async fn serve<H>(port: u16, handler: H) -> Result<ServerHandle, ServerError>
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    Server::builder().port(port).build()?.start(handler).await
}

/// Handle to a running server.
///
/// Dropping the handle leaves the server running, call [`close`](ServerHandle::close) to stop it.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<Shutdown>,
    accept_task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the listening socket is bound to, useful after binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_closed()
    }

    /// Stops accepting connections and closes the listening socket.
    ///
    /// Returns after the accept loop has exited. In-flight connections are not cancelled.
    pub async fn close(self) -> Result<(), ServerError> {
        self.shutdown.close();
        self.accept_task.await?;
        info!(local_addr = %self.local_addr, "server closed");
        Ok(())
    }
}

/// The shutdown flag shared between the handle and the accept loop.
#[derive(Debug, Default)]
struct Shutdown {
    closed: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        // notify_one keeps a permit when the accept loop isn't waiting right now
        self.notify.notify_one();
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, shutdown: Arc<Shutdown>, config: ConnectionConfig)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        if shutdown.is_closed() {
            break;
        }

        let accepted = tokio::select! {
            biased;
            () = shutdown.notify.notified() => break,
            accepted = listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                if shutdown.is_closed() {
                    break;
                }
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };
        debug!(%remote_addr, "connection established");

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_config(reader, writer, config);
            match connection.process(handler.as_ref()).await {
                Ok(()) => {
                    debug!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e @ HttpError::RequestError { .. }) => {
                    warn!(%remote_addr, cause = %e, "bad request, connection shutdown");
                }
                Err(e @ (HttpError::HandlerError { .. } | HttpError::HandlerPanic { .. })) => {
                    debug!(%remote_addr, cause = %e, "handler failed, connection shutdown");
                }
                Err(e) => {
                    error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                }
            }
        });
    }

    info!("stop accepting connections");
}

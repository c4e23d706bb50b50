use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;

use crate::connection::ConnectionConfig;
use crate::server::Server;

/// Configures and builds a [`Server`].
///
/// ```
/// use std::time::Duration;
/// use tcp_http::server::Server;
///
/// let server = Server::builder()
///     .address("127.0.0.1:42069")
///     .max_request_size(1024 * 1024)
///     .read_timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    config: ConnectionConfig,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,

    #[error("can't resolve address: {source}")]
    InvalidAddress {
        #[from]
        source: io::Error,
    },

    #[error("address resolved to nothing")]
    EmptyAddress,

    #[error("initial buffer size {initial_buffer_size} must be in 1..={max_request_size}")]
    InvalidBufferSize { initial_buffer_size: usize, max_request_size: usize },
}

impl ServerBuilder {
    pub(crate) fn new() -> Self {
        Self { address: None, config: ConnectionConfig::default() }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    /// Listens on `port` on all IPv4 interfaces.
    pub fn port(self, port: u16) -> Self {
        self.address(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
    }

    pub fn initial_buffer_size(mut self, initial_buffer_size: usize) -> Self {
        self.config.initial_buffer_size = initial_buffer_size;
        self
    }

    /// The most unparsed request bytes a connection may buffer, 8 MiB by default.
    pub fn max_request_size(mut self, max_request_size: usize) -> Self {
        self.config.max_request_size = max_request_size;
        self
    }

    /// Fails requests that take longer than `read_timeout` to arrive. Unset by default.
    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.config.read_timeout = Some(read_timeout);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)??;
        if address.is_empty() {
            return Err(ServerBuildError::EmptyAddress);
        }

        let ConnectionConfig { initial_buffer_size, max_request_size, .. } = self.config;
        if initial_buffer_size == 0 || initial_buffer_size > max_request_size {
            return Err(ServerBuildError::InvalidBufferSize { initial_buffer_size, max_request_size });
        }

        Ok(Server::new(address, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_REQUEST_SIZE};

    #[test]
    fn defaults() {
        let server = Server::builder().address("127.0.0.1:8080").build().unwrap();

        assert_eq!(server.address(), &["127.0.0.1:8080".parse::<SocketAddr>().unwrap()]);
        assert_eq!(server.config().initial_buffer_size, DEFAULT_INITIAL_BUFFER_SIZE);
        assert_eq!(server.config().max_request_size, DEFAULT_MAX_REQUEST_SIZE);
        assert_eq!(server.config().read_timeout, None);
    }

    #[test]
    fn port_binds_all_interfaces() {
        let server = Server::builder().port(42069).build().unwrap();
        assert_eq!(server.address(), &["0.0.0.0:42069".parse::<SocketAddr>().unwrap()]);
    }

    #[test]
    fn custom_limits() {
        let server = Server::builder()
            .address("127.0.0.1:0")
            .initial_buffer_size(64)
            .max_request_size(4096)
            .read_timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        assert_eq!(
            server.config(),
            &ConnectionConfig { initial_buffer_size: 64, max_request_size: 4096, read_timeout: Some(Duration::from_secs(1)) }
        );
    }

    #[test]
    fn missing_address() {
        assert!(matches!(Server::builder().build(), Err(ServerBuildError::MissingAddress)));
    }

    #[test]
    fn invalid_address() {
        assert!(matches!(Server::builder().address("not an address").build(), Err(ServerBuildError::InvalidAddress { .. })));
    }

    #[test]
    fn invalid_buffer_size() {
        let result = Server::builder().port(0).initial_buffer_size(0).build();
        assert!(matches!(result, Err(ServerBuildError::InvalidBufferSize { initial_buffer_size: 0, .. })));

        let result = Server::builder().port(0).initial_buffer_size(2048).max_request_size(1024).build();
        assert!(matches!(result, Err(ServerBuildError::InvalidBufferSize { initial_buffer_size: 2048, max_request_size: 1024 })));
    }
}

//! An HTTP/1.1 engine working directly on raw TCP byte streams
//!
//! This crate parses requests incrementally from a stream that has no message
//! boundaries, writes responses through an ordering-checked writer, and serves
//! connections from a tokio TCP listener. Every connection carries exactly one
//! request and one response before it is closed.
//!
//! # Features
//!
//! - Incremental request parsing, independent of how the input is fragmented
//! - Read buffer growth bounded by a hard cap (8 MiB by default)
//! - Strict header field name validation
//! - `Content-Length` body framing
//! - Raw and chunked response bodies, with trailers
//! - One tokio task per connection, handler panics contained per connection
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tcp_http::connection::ResponseWriter;
//! use tcp_http::handler::{Handler, HandlerError};
//! use tcp_http::protocol::{Headers, Request, StatusCode};
//! use tokio::net::tcp::OwnedWriteHalf;
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler<OwnedWriteHalf> for HelloWorld {
//!     async fn call(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: Request) -> Result<(), HandlerError> {
//!         info!(path = request.target(), "request target");
//!
//!         let body = b"Hello World!\r\n";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&Headers::default_response("text/plain", body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let server = tcp_http::server::serve(42069, HelloWorld).await.expect("bind server");
//!     tokio::signal::ctrl_c().await.expect("listen for ctrl-c");
//!     server.close().await.expect("close server");
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: Request, headers and error types
//! - [`codec`]: Request parsing state machine and response encoders
//! - [`connection`]: Read buffering, the response writer and per-connection processing
//! - [`handler`]: The request callback trait
//! - [`server`]: Listener, accept loop and shutdown
//!
//! # Error Handling
//!
//! - [`protocol::ParseError`]: The request could not be read, the handler is not invoked
//! - [`protocol::SendError`]: Writing the response failed, or the writer was used out of order
//! - [`protocol::HttpError`]: Top-level error of a connection
//!
//! Parse failures close the connection without a response. Nothing is retried.
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no HTTP/2 and no TLS
//! - No keep-alive or pipelining
//! - Request bodies need a `Content-Length`, chunked requests are not supported

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;

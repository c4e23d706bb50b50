//! TCP server: accepts connections and serves one request on each.
//!
//! Every accepted connection is handled by its own tokio task, so a slow peer
//! only ever stalls its own connection. [`ServerHandle::close`] stops accepting
//! and closes the listening socket. Connections already being served run to
//! completion.
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tcp_http::connection::ResponseWriter;
//! use tcp_http::handler::{Handler, HandlerError};
//! use tcp_http::protocol::{Headers, Request, StatusCode};
//! use tokio::net::tcp::OwnedWriteHalf;
//!
//! struct NotFound;
//!
//! #[async_trait]
//! impl Handler<OwnedWriteHalf> for NotFound {
//!     async fn call(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, _request: Request) -> Result<(), HandlerError> {
//!         writer.write_status_line(StatusCode::NOT_FOUND).await?;
//!         writer.write_headers(&Headers::default_response("text/plain", 0)).await?;
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let server = tcp_http::server::serve(42069, NotFound).await?;
//! // ...
//! server.close().await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod listener;

pub use builder::{ServerBuildError, ServerBuilder};
pub use listener::{Server, ServerError, ServerHandle, serve};

//! The user supplied request callback.
//!
//! A [`Handler`] receives the assembled [`Request`] together with a
//! [`ResponseWriter`] bound to the connection and writes the whole response
//! through it. The connection is closed once `call` returns, whatever the outcome.
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tcp_http::connection::ResponseWriter;
//! use tcp_http::handler::{Handler, HandlerError};
//! use tcp_http::protocol::{Headers, Request, StatusCode};
//! use tokio::io::AsyncWrite;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl<W> Handler<W> for HelloWorld
//! where
//!     W: AsyncWrite + Unpin + Send,
//! {
//!     async fn call(&self, writer: &mut ResponseWriter<W>, _request: Request) -> Result<(), HandlerError> {
//!         let body = b"Hello World!";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&Headers::default_response("text/plain", body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//! ```

use std::error::Error;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

/// Error returned by a handler, logged by the connection and otherwise dropped.
pub type HandlerError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), HandlerError>;
}

/// A [`Handler`] backed by a function, see [`make_handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<W, F> Handler<W> for HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, Request) -> BoxFuture<'a, Result<(), HandlerError>> + Send + Sync,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), HandlerError> {
        (self.f)(writer, request).await
    }
}

/// Turns a function into a [`Handler`].
///
/// The returned future borrows the writer, so it is boxed:
///
/// ```no_run
/// use futures::FutureExt;
/// use futures::future::BoxFuture;
/// use tcp_http::connection::ResponseWriter;
/// use tcp_http::handler::{HandlerError, make_handler};
/// use tcp_http::protocol::{Headers, Request, StatusCode};
/// use tokio::net::tcp::OwnedWriteHalf;
///
/// fn hello(writer: &mut ResponseWriter<OwnedWriteHalf>, _request: Request) -> BoxFuture<'_, Result<(), HandlerError>> {
///     async move {
///         writer.write_status_line(StatusCode::OK).await?;
///         writer.write_headers(&Headers::default_response("text/plain", 0)).await?;
///         Ok::<_, HandlerError>(())
///     }
///     .boxed()
/// }
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let server = tcp_http::server::serve(42069, make_handler(hello)).await?;
/// # Ok(())
/// # }
/// ```
pub fn make_handler<W, F>(f: F) -> HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, Request) -> BoxFuture<'a, Result<(), HandlerError>> + Send + Sync,
{
    HandlerFn { f }
}

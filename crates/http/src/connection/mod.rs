//! HTTP connection handling module
//!
//! This module drives a single connection from raw bytes to a finished response.
//!
//! # Components
//!
//! - [`RequestReader`]: Growable read buffer feeding the request decoder
//!   - Doubles its capacity up to a hard cap
//!   - Drops consumed bytes after every parse pass
//! - [`ResponseWriter`]: Ordered response output
//!   - Status line, then headers, then raw or chunked body
//!   - Rejects out of order calls without writing anything
//! - [`HttpConnection`]: One request, one handler call, then shutdown
//!
//! Connections are not kept alive: every connection carries exactly one
//! request and one response.

mod http_connection;
mod request_reader;
mod response_writer;

pub use http_connection::{ConnectionConfig, HttpConnection};
pub use request_reader::{DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_REQUEST_SIZE, RequestReader};
pub use response_writer::{ResponseWriter, WriterState};

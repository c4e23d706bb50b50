//! HTTP body handling module for request and response payloads
//!
//! # Components
//!
//! ## Decoders
//! - [`LengthDecoder`]: Collects a body framed by `Content-Length`
//! - [`content_length`]: Reads the declared length from the request headers
//!
//! ## Encoders
//! - [`ChunkedEncoder`]: Implements chunked transfer encoding with trailers
//!
//! Requests are never chunked here, only responses. A request body is
//! buffered whole before the handler runs.

mod chunked_encoder;
mod length_decoder;

pub(crate) use chunked_encoder::{ChunkItem, ChunkedEncoder};
pub(crate) use length_decoder::{LengthDecoder, content_length};

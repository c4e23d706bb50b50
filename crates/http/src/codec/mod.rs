//! HTTP codec module for decoding requests and encoding responses
//!
//! This module implements the wire format on top of plain byte buffers. It
//! uses a state machine to assemble requests from fragmented input and small
//! [`Encoder`](tokio_util::codec::Encoder) implementations for the response parts.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Assembles a complete request from arbitrarily split input
//!   - Request line and header parsing via the `header` module
//!   - `Content-Length` body framing via the `body` module
//!
//! - Response handling:
//!   - Status line and header encoding via the `header` module
//!   - Chunked body encoding via the `body` module
//!
//! The response encoders are driven by
//! [`ResponseWriter`](crate::connection::ResponseWriter), which enforces the
//! order in which they may be used.

mod body;
mod header;
mod request_decoder;

pub use request_decoder::RequestDecoder;

pub(crate) use body::{ChunkItem, ChunkedEncoder};
pub(crate) use header::{HeaderEncoder, StatusLineEncoder};

use bytes::{BufMut, BytesMut};
use std::io;

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the encode buffer.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl io::Write for FastWrite<'_> {
    /// Writes a buffer into this writer, returning how many bytes were written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    /// Flush this output stream, ensuring that all intermediately buffered contents reach their destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

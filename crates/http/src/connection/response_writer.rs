use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::{ChunkItem, ChunkedEncoder, HeaderEncoder, StatusLineEncoder};
use crate::protocol::{Headers, SendError};

/// Initial size of the encode buffer
const INIT_BUFFER_SIZE: usize = 1024;

/// Position of a [`ResponseWriter`] within the response.
///
/// The writer only ever moves forward: status line, then headers, then any
/// number of body writes. [`WritingBody`](WriterState::WritingBody) is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    AwaitingStatusLine,
    AwaitingHeaders,
    WritingBody,
}

/// Writes one response to an output sink, in order.
///
/// A call made in the wrong state fails with
/// [`SendError::ProtocolStateViolation`] and writes nothing. Every successful
/// call is flushed to the sink before it returns.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    chunked_encoder: ChunkedEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            state: WriterState::AwaitingStatusLine,
            chunked_encoder: ChunkedEncoder::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`, the reason falling back to `Unknown`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.expect_state(WriterState::AwaitingStatusLine, "write status line")?;
        self.state = WriterState::AwaitingHeaders;

        trace!(status = status.as_u16(), "write status line");
        StatusLineEncoder.encode(status, &mut self.buffer)?;
        self.flush_buffer().await
    }

    /// Writes every header field followed by the blank line ending the head.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.expect_state(WriterState::AwaitingHeaders, "write headers")?;
        self.state = WriterState::WritingBody;

        HeaderEncoder.encode(headers, &mut self.buffer)?;
        self.flush_buffer().await
    }

    /// Writes `body` verbatim, returning the number of bytes written.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_body("write body")?;

        self.writer.write_all(body).await?;
        self.writer.flush().await?;
        Ok(body.len())
    }

    /// Writes `chunk` framed as `<hex-len>\r\n<chunk>\r\n`.
    ///
    /// Returns the number of bytes written including the framing.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, SendError> {
        self.expect_body("write chunked body")?;

        self.chunked_encoder.encode(ChunkItem::Chunk(chunk), &mut self.buffer)?;
        let written = self.buffer.len();
        self.flush_buffer().await?;
        Ok(written)
    }

    /// Ends a chunked body: writes `0\r\n`, the trailer fields and the final blank line.
    ///
    /// Pass an empty [`Headers`] when there are no trailers. No body write of any
    /// kind is accepted afterwards.
    pub async fn write_chunked_body_done(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.expect_body("write chunked body done")?;

        self.chunked_encoder.encode(ChunkItem::Last(trailers), &mut self.buffer)?;
        self.flush_buffer().await
    }

    /// Returns the underlying sink, e.g. to shut it down.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn expect_state(&self, expected: WriterState, operation: &'static str) -> Result<(), SendError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SendError::state_violation(operation, self.state))
        }
    }

    fn expect_body(&self, operation: &'static str) -> Result<(), SendError> {
        self.expect_state(WriterState::WritingBody, operation)?;
        if self.chunked_encoder.is_finish() {
            return Err(SendError::state_violation(operation, self.state));
        }
        Ok(())
    }

    async fn flush_buffer(&mut self) -> Result<(), SendError> {
        let result = self.writer.write_all(&self.buffer).await;
        self.buffer.clear();
        result?;
        Ok(self.writer.flush().await?)
    }
}

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::RequestDecoder;
use crate::ensure;
use crate::protocol::{ParseError, Request};

/// Initial capacity of the read buffer
pub const DEFAULT_INITIAL_BUFFER_SIZE: usize = 1024;

/// Hard cap on buffered, not yet parsed bytes
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Reads one request from a byte stream.
///
/// The buffer starts at `initial_buffer_size` and doubles whenever it fills up
/// without the decoder being able to take a complete line out of it. Growing past
/// `max_request_size` fails with [`ParseError::RequestTooLarge`]. Bytes consumed by
/// the decoder are dropped from the front after every pass.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: BytesMut,
    capacity: usize,
    max_request_size: usize,
    decoder: RequestDecoder,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_REQUEST_SIZE)
    }

    /// Creates a reader with a custom initial buffer size and cap.
    ///
    /// A zero `initial_buffer_size` is treated as 1 so the buffer can still double.
    pub fn with_capacity(reader: R, initial_buffer_size: usize, max_request_size: usize) -> Self {
        let capacity = initial_buffer_size.max(1);
        Self { reader, buffer: BytesMut::with_capacity(capacity), capacity, max_request_size, decoder: RequestDecoder::new() }
    }

    /// Reads until a complete request has been assembled.
    ///
    /// Errors of the underlying reader are returned as [`ParseError::Io`] unchanged.
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        loop {
            if self.buffer.len() >= self.capacity {
                let next_capacity = self.capacity.saturating_mul(2);
                ensure!(next_capacity <= self.max_request_size, ParseError::request_too_large(self.max_request_size));
                trace!(from = self.capacity, to = next_capacity, "grow request buffer");
                self.capacity = next_capacity;
            }

            let available = self.capacity - self.buffer.len();
            self.buffer.reserve(available);

            let read = self.reader.read_buf(&mut (&mut self.buffer).limit(available)).await?;
            trace!(read, buffered = self.buffer.len(), "read from stream");

            let request = if read == 0 {
                self.decoder.decode_eof(&mut self.buffer)?
            } else {
                self.decoder.decode(&mut self.buffer)?
            };

            if let Some(request) = request {
                return Ok(request);
            }
        }
    }

    /// Bytes read from the stream that are not part of the returned request.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Emulates a network connection returning at most `bytes_per_read` bytes per read.
    struct ChunkReader {
        data: Vec<u8>,
        bytes_per_read: usize,
        pos: usize,
    }

    impl ChunkReader {
        fn new(data: impl Into<Vec<u8>>, bytes_per_read: usize) -> Self {
            Self { data: data.into(), bytes_per_read, pos: 0 }
        }
    }

    impl AsyncRead for ChunkReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let end = cmp::min(self.pos + self.bytes_per_read, self.data.len());
            let amt = cmp::min(end - self.pos, buf.remaining());
            let start = self.pos;
            buf.put_slice(&self.data[start..start + amt]);
            self.pos += amt;
            Poll::Ready(Ok(()))
        }
    }

    /// Fails every read.
    struct BrokenReader;

    impl AsyncRead for BrokenReader {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")))
        }
    }

    async fn read(data: &str, bytes_per_read: usize) -> Result<Request, ParseError> {
        RequestReader::new(ChunkReader::new(data, bytes_per_read)).read_request().await
    }

    #[tokio::test]
    async fn standard_headers() {
        let request =
            read("GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n", 3).await.unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), "1.1");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn duplicate_headers() {
        let request = read("GET / HTTP/1.1\r\nHost: localhost:42069\r\nHost: localhost:8080\r\n\r\n", 3).await.unwrap();
        assert_eq!(request.headers().get("host"), Some("localhost:42069, localhost:8080"));
    }

    #[tokio::test]
    async fn one_byte_per_read() {
        let data = "POST /coffee HTTP/1.1\r\nContent-Length: 13\r\n\r\nhello world!\n";

        let bulk = read(data, data.len()).await.unwrap();
        let byte_by_byte = read(data, 1).await.unwrap();

        assert_eq!(bulk, byte_by_byte);
        assert_eq!(&byte_by_byte.body()[..], b"hello world!\n");
    }

    #[tokio::test]
    async fn malformed_header() {
        let result = read("GET / HTTP/1.1\r\nHost localhost:42069\r\n\r\n", 3).await;
        assert!(matches!(result, Err(ParseError::MalformedHeader { .. })));
    }

    #[tokio::test]
    async fn missing_end_of_headers() {
        let result = read("GET / HTTP/1.1\r\nHost: localhost:42069\r\n", 3).await;
        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn request_line_only() {
        let result = read("GET / HTTP/1.1\r\n", 3).await;
        assert!(matches!(result, Err(ParseError::Io { .. })));
    }

    #[tokio::test]
    async fn body_shorter_than_content_length() {
        let result =
            read("POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 20\r\n\r\npartial content", 3).await;
        assert!(matches!(result, Err(ParseError::TruncatedBody { expected: 20, received: 15 })));
    }

    #[tokio::test]
    async fn empty_body_without_content_length() {
        let request = read("POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\n", 3).await.unwrap();
        assert!(request.body().is_empty());

        let request = read("POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 0\r\n\r\n", 3).await.unwrap();
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn body_without_content_length_is_ignored() {
        let request = read("POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\nhello world!", 3).await.unwrap();
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn buffer_grows_for_long_lines() {
        let value = "v".repeat(5000);
        let data = format!("GET / HTTP/1.1\r\nX-Long: {value}\r\n\r\n");

        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 700), 16, 16 * 1024);
        let request = reader.read_request().await.unwrap();

        assert_eq!(request.headers().get("x-long"), Some(value.as_str()));
    }

    #[tokio::test]
    async fn request_too_large() {
        let mut data = b"GET /".to_vec();
        data.resize(DEFAULT_MAX_REQUEST_SIZE + 1, b'a');

        let bytes_per_read = data.len();
        let result = RequestReader::new(ChunkReader::new(data, bytes_per_read)).read_request().await;
        assert!(matches!(result, Err(ParseError::RequestTooLarge { max_size: DEFAULT_MAX_REQUEST_SIZE })));
    }

    #[tokio::test]
    async fn request_too_large_with_small_cap() {
        let data = format!("GET / HTTP/1.1\r\nX-Long: {}\r\n\r\n", "v".repeat(100));

        let result = RequestReader::with_capacity(ChunkReader::new(data, 8), 8, 64).read_request().await;
        assert!(matches!(result, Err(ParseError::RequestTooLarge { max_size: 64 })));
    }

    #[tokio::test]
    async fn large_body_is_not_capped_by_buffer() {
        let body = "b".repeat(4096);
        let data = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n{body}", body.len());

        let request = RequestReader::with_capacity(ChunkReader::new(data, 100), 64, 128).read_request().await.unwrap();
        assert_eq!(request.body().len(), 4096);
    }

    #[tokio::test]
    async fn keeps_bytes_after_request() {
        let mut reader = RequestReader::new(ChunkReader::new("GET / HTTP/1.1\r\n\r\nextra", 1024));
        reader.read_request().await.unwrap();

        assert_eq!(reader.buffered(), b"extra");
    }

    #[tokio::test]
    async fn io_error_propagates() {
        let result = RequestReader::new(BrokenReader).read_request().await;
        assert!(matches!(result, Err(ParseError::Io { source }) if source.kind() == io::ErrorKind::ConnectionReset));
    }
}

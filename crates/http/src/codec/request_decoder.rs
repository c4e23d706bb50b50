//! HTTP request decoder module
//!
//! This module assembles a complete [`Request`] from a byte buffer that may be
//! filled in arbitrarily small pieces. It drives the request line parser, the
//! header decoder and the body decoder in sequence through a state machine.
//!
//! # Example
//!
//! ```
//! use tcp_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//!
//! let mut buffer = BytesMut::from(&b"GET /coffee HTTP/1.1\r\nHost: loc"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"alhost\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/coffee");
//! assert_eq!(request.headers().get("host"), Some("localhost"));
//! ```

use std::io;
use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::{LengthDecoder, content_length};
use crate::codec::header::{HeaderDecoder, HeaderLine, parse_request_line};
use crate::protocol::{Headers, ParseError, Request, RequestLine};

/// Parse progress of the request being assembled.
#[derive(Debug, Default)]
enum DecodeState {
    /// Waiting for the complete request line
    #[default]
    RequestLine,
    /// Request line parsed, reading header field lines
    Headers(RequestLine),
    /// Header section finished, collecting `Content-Length` bytes
    Body(RequestLine, LengthDecoder),
    /// Request complete, waiting to be handed out
    Done(RequestLine, Bytes),
}

/// Whether a single parse step made progress.
enum Step {
    Advanced,
    NeedMore,
}

/// A decoder assembling one HTTP request from a growing buffer.
///
/// Each step consumes the bytes it parsed from the front of the buffer, so
/// unconsumed input always starts at the next unparsed byte. Feeding the same
/// request split at any byte offsets yields the same [`Request`].
#[derive(Debug, Default)]
pub struct RequestDecoder {
    state: DecodeState,
    header_decoder: HeaderDecoder,
    headers: Headers,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the request is complete and waiting in the decoder.
    pub fn is_done(&self) -> bool {
        matches!(self.state, DecodeState::Done(..))
    }

    /// Runs one transition of the state machine.
    fn step(&mut self, src: &mut BytesMut) -> Result<Step, ParseError> {
        match mem::take(&mut self.state) {
            DecodeState::RequestLine => match parse_request_line(src)? {
                Some((request_line, consumed)) => {
                    trace!(method = %request_line.method, path = %request_line.target, "parsed request line");
                    src.advance(consumed);
                    self.state = DecodeState::Headers(request_line);
                    Ok(Step::Advanced)
                }
                None => {
                    self.state = DecodeState::RequestLine;
                    Ok(Step::NeedMore)
                }
            },

            DecodeState::Headers(request_line) => {
                let line = match self.header_decoder.decode(&mut self.headers, src) {
                    Ok(line) => line,
                    Err(e) => {
                        self.state = DecodeState::Headers(request_line);
                        return Err(e);
                    }
                };

                match line {
                    Some(line @ HeaderLine::Field { .. }) => {
                        src.advance(line.consumed());
                        self.state = DecodeState::Headers(request_line);
                        Ok(Step::Advanced)
                    }
                    Some(line @ HeaderLine::End) => {
                        src.advance(line.consumed());
                        self.state = self.body_state(request_line)?;
                        Ok(Step::Advanced)
                    }
                    None => {
                        self.state = DecodeState::Headers(request_line);
                        Ok(Step::NeedMore)
                    }
                }
            }

            DecodeState::Body(request_line, mut length_decoder) => {
                let consumed = length_decoder.decode(src);
                trace!(consumed, remaining = length_decoder.remaining(), "decoded body bytes");

                if length_decoder.is_complete() {
                    self.state = DecodeState::Done(request_line, length_decoder.into_body());
                    Ok(Step::Advanced)
                } else {
                    self.state = DecodeState::Body(request_line, length_decoder);
                    Ok(Step::NeedMore)
                }
            }

            state @ DecodeState::Done(..) => {
                self.state = state;
                Ok(Step::NeedMore)
            }
        }
    }

    /// Picks the state following the header section.
    ///
    /// Without a `Content-Length` the request has no body, even if the peer sends one.
    fn body_state(&self, request_line: RequestLine) -> Result<DecodeState, ParseError> {
        match content_length(&self.headers)? {
            None | Some(0) => Ok(DecodeState::Done(request_line, Bytes::new())),
            Some(length) => Ok(DecodeState::Body(request_line, LengthDecoder::new(length))),
        }
    }

    /// Hands out the completed request and resets the decoder.
    fn take_request(&mut self) -> Option<Request> {
        match mem::take(&mut self.state) {
            DecodeState::Done(request_line, body) => {
                let headers = mem::take(&mut self.headers);
                Some(Request::from_parts(request_line, headers, body))
            }
            state => {
                self.state = state;
                None
            }
        }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to assemble a request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: The request is complete, bytes past its end stay in `src`
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: The request is malformed, nothing of the failing line is consumed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.is_done() {
                return Ok(self.take_request());
            }

            match self.step(src)? {
                Step::Advanced => {}
                Step::NeedMore => return Ok(None),
            }
        }
    }

    /// Called once the stream has ended.
    ///
    /// A request still incomplete at that point fails: with
    /// [`ParseError::TruncatedBody`] while collecting the body, with an
    /// `UnexpectedEof` io error before that.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match &self.state {
            DecodeState::Body(_, length_decoder) => Err(length_decoder.truncated()),
            DecodeState::RequestLine => {
                Err(ParseError::io(io::Error::new(io::ErrorKind::UnexpectedEof, "stream ended before the request line")))
            }
            DecodeState::Headers(_) => {
                Err(ParseError::io(io::Error::new(io::ErrorKind::UnexpectedEof, "stream ended before the end of headers")))
            }
            DecodeState::Done(..) => Ok(self.take_request()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    /// Feeds `src` to a fresh decoder `chunk_size` bytes at a time.
    fn decode_in_chunks(src: &[u8], chunk_size: usize) -> Result<Option<Request>, ParseError> {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::new();

        for chunk in src.chunks(chunk_size) {
            buffer.extend_from_slice(chunk);
            if let Some(request) = decoder.decode(&mut buffer)? {
                return Ok(Some(request));
            }
        }

        decoder.decode_eof(&mut buffer)
    }

    fn crlf(str: &str) -> Vec<u8> {
        str.replace('\n', "\r\n").into_bytes()
    }

    #[test]
    fn from_curl() {
        let src = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: localhost:42069
        User-Agent: curl/7.81.0
        Accept: */*

        "##});

        let request = decode_in_chunks(&src, src.len()).unwrap().unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/index.html");
        assert_eq!(request.version(), "1.1");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn chunk_size_independence() {
        let src: &[u8] = b"POST /submit HTTP/1.1\r\n\
            Host: localhost:42069\r\n\
            Host: localhost:8080\r\n\
            Content-Type: text/plain\r\n\
            Content-Length: 13\r\n\
            \r\n\
            hello world!\n";

        let expected = decode_in_chunks(src, src.len()).unwrap().unwrap();
        assert_eq!(&expected.body()[..], b"hello world!\n");
        assert_eq!(expected.headers().get("host"), Some("localhost:42069, localhost:8080"));

        for chunk_size in [1, 2, 3, 5, 8, 13, 64] {
            let request = decode_in_chunks(src, chunk_size).unwrap().unwrap();
            assert_eq!(request, expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn partial_request_keeps_unparsed_bytes() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: local"[..]);

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"Host: local");
        assert!(!decoder.is_done());
    }

    #[test]
    fn body_with_content_length() {
        let src = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";

        let request = decode_in_chunks(src, 3).unwrap().unwrap();
        assert_eq!(&request.body()[..], b"hello world!\n");
    }

    #[test]
    fn bytes_past_body_stay_in_buffer() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef"[..]);

        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&request.body()[..], b"abc");
        assert_eq!(&buffer[..], b"def");
    }

    #[test]
    fn body_shorter_than_content_length() {
        let src = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 20\r\n\r\npartial content";

        match decode_in_chunks(src, 3) {
            Err(ParseError::TruncatedBody { expected, received }) => {
                assert_eq!(expected, 20);
                assert_eq!(received, 15);
            }
            other => panic!("expect truncated body, got {other:?}"),
        }
    }

    #[test]
    fn zero_content_length_completes_after_headers() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 0\r\n\r\n"[..]);

        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(request.body().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn missing_content_length_ignores_body() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\r\nhello world!"[..]);

        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert!(request.body().is_empty());
        assert_eq!(&buffer[..], b"hello world!");
    }

    #[test]
    fn invalid_content_length() {
        let src = b"POST / HTTP/1.1\r\nContent-Length: twelve\r\n\r\n";
        assert!(matches!(decode_in_chunks(src, 4), Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn malformed_header() {
        let src = b"GET / HTTP/1.1\r\nHost localhost:42069\r\n\r\n";
        assert!(matches!(decode_in_chunks(src, 3), Err(ParseError::MalformedHeader { .. })));
    }

    #[test]
    fn malformed_header_consumes_nothing() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nH\xc2\xa9st: localhost:42069\r\n\r\n"[..]);

        assert!(matches!(decoder.decode(&mut buffer), Err(ParseError::MalformedHeader { .. })));
        assert!(buffer.starts_with(b"H\xc2\xa9st"));
    }

    #[test]
    fn obs_text_is_not_rejected() {
        let src = b"GET /caf\xe9 HTTP/1.1\r\nX-Name: caf\xe9\r\n\r\n";

        let request = decode_in_chunks(src, 3).unwrap().unwrap();
        let (request_line, headers, body) = request.into_parts();

        assert_eq!(request_line.target, "/caf\u{e9}");
        assert_eq!(headers.get("x-name"), Some("caf\u{e9}"));
        assert!(body.is_empty());
    }

    #[test]
    fn malformed_request_line() {
        let src = b"/coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        assert!(matches!(decode_in_chunks(src, 3), Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn missing_end_of_headers() {
        let src = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\n";
        match decode_in_chunks(src, 3) {
            Err(ParseError::Io { source }) => assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expect unexpected eof, got {other:?}"),
        }
    }

    #[test]
    fn empty_stream() {
        match decode_in_chunks(b"", 1) {
            Err(ParseError::Io { source }) => assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expect unexpected eof, got {other:?}"),
        }
    }

    #[test]
    fn decoder_is_reusable() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET /first HTTP/1.1\r\nX-A: 1\r\n\r\nGET /second HTTP/1.1\r\n\r\n"[..]);

        let first = decoder.decode(&mut buffer).unwrap().unwrap();
        let second = decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(first.target(), "/first");
        assert_eq!(second.target(), "/second");
        assert!(second.headers().is_empty());
    }
}

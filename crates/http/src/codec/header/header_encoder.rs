//! Serialization of the response head: the status line and header field blocks.
//!
//! The same field block format is used for response headers and for the
//! trailer section that follows the last chunk of a chunked body.

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;

use crate::protocol::{Headers, SendError};
use crate::utils::CRLF;

/// Reason phrase used for codes without a canonical one.
const UNKNOWN_REASON: &str = "Unknown";

/// Encodes `HTTP/1.1 <code> <reason>\r\n`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StatusLineEncoder;

impl Encoder<StatusCode> for StatusLineEncoder {
    type Error = SendError;

    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let reason = status.canonical_reason().unwrap_or(UNKNOWN_REASON);

        dst.reserve(b"HTTP/1.1 ".len() + 3 + 1 + reason.len() + CRLF.len());
        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(status.as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(reason.as_bytes());
        dst.put_slice(CRLF);
        Ok(())
    }
}

/// Encodes one `<name>: <value>\r\n` line per field followed by the blank line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeaderEncoder;

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for (name, value) in headers {
            dst.reserve(name.len() + 2 + value.len() + CRLF.len());
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF);
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_with_known_reason() {
        let mut dst = BytesMut::new();
        StatusLineEncoder.encode(StatusCode::OK, &mut dst).unwrap();
        StatusLineEncoder.encode(StatusCode::BAD_REQUEST, &mut dst).unwrap();
        StatusLineEncoder.encode(StatusCode::INTERNAL_SERVER_ERROR, &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.1 200 OK\r\nHTTP/1.1 400 Bad Request\r\nHTTP/1.1 500 Internal Server Error\r\n");
    }

    #[test]
    fn status_line_with_unknown_reason() {
        let mut dst = BytesMut::new();
        StatusLineEncoder.encode(StatusCode::from_u16(599).unwrap(), &mut dst).unwrap();

        assert_eq!(&dst[..], b"HTTP/1.1 599 Unknown\r\n");
    }

    #[test]
    fn header_block() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&headers, &mut dst).unwrap();

        assert_eq!(&dst[..], b"content-type: text/plain\r\n\r\n");
    }

    #[test]
    fn empty_header_block() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&Headers::new(), &mut dst).unwrap();

        assert_eq!(&dst[..], b"\r\n");
    }
}

use bytes::Bytes;

use crate::protocol::Headers;

/// The first line of a request, e.g. `GET /index.html HTTP/1.1`.
///
/// `version` holds the version number only, the `HTTP/` prefix is stripped
/// once it has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

/// A fully assembled request: request line, headers and a body framed by `Content-Length`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub(crate) fn from_parts(request_line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    #[inline]
    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestLine, Headers, Bytes) {
        (self.request_line, self.headers, self.body)
    }
}

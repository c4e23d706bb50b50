//! Decoder implementation for request bodies framed by a `Content-Length` header.
//!
//! This module provides functionality to collect a payload whose size is declared
//! up front, as defined in
//! [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).
//!
//! A request without `Content-Length` (or with an empty value) has no body:
//! any bytes after the header section are ignored rather than rejected.

use std::cmp;

use bytes::{Bytes, BytesMut};

use crate::protocol::{Headers, ParseError};

const CONTENT_LENGTH: &str = "content-length";

/// Reads the declared body length from `headers`.
///
/// # Returns
/// * `Ok(None)` when the header is absent or empty
/// * `Ok(Some(length))` for a non-negative integer value
/// * `Err(ParseError::InvalidContentLength)` otherwise
pub(crate) fn content_length(headers: &Headers) -> Result<Option<u64>, ParseError> {
    let Some(value) = headers.get(CONTENT_LENGTH).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    value
        .parse::<u64>()
        .map(Some)
        .map_err(|e| ParseError::invalid_content_length(format!("value {value} is not u64: {e}")))
}

/// Accumulates exactly `length` body bytes.
///
/// Each call to [`decode`](LengthDecoder::decode) takes at most the number of
/// bytes still missing, so bytes past the declared length are never consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LengthDecoder {
    /// The declared content length
    length: u64,
    /// The body bytes collected so far
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub(crate) fn new(length: u64) -> Self {
        let initial = usize::try_from(length).map_or(0, |length| cmp::min(length, 64 * 1024));
        Self { length, body: BytesMut::with_capacity(initial) }
    }

    #[inline]
    pub(crate) fn received(&self) -> u64 {
        self.body.len() as u64
    }

    #[inline]
    pub(crate) fn remaining(&self) -> u64 {
        self.length - self.received()
    }

    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves up to [`remaining`](LengthDecoder::remaining) bytes from the front
    /// of `src` into the body.
    ///
    /// Returns the number of bytes consumed from `src`.
    pub(crate) fn decode(&mut self, src: &mut BytesMut) -> usize {
        let len = usize::try_from(self.remaining()).map_or(src.len(), |remaining| cmp::min(remaining, src.len()));
        if len == 0 {
            return 0;
        }

        let bytes = src.split_to(len);
        self.body.extend_from_slice(&bytes);
        len
    }

    /// The error reported when the stream ends before the body is complete.
    pub(crate) fn truncated(&self) -> ParseError {
        ParseError::truncated_body(self.length, self.received())
    }

    pub(crate) fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

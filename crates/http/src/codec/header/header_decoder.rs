//! HTTP header field decoder.
//!
//! Parses one `name: value\r\n` field line per call into a [`Headers`] map.
//! The empty line that terminates the header section is reported separately
//! so the request decoder can move on to the body.
//!
//! # Validation
//!
//! - the line must contain a colon, and no whitespace may precede it
//!   (`Host : x` is rejected, see
//!   [RFC 9112 Section 5.1](https://www.rfc-editor.org/rfc/rfc9112#section-5.1))
//! - the trimmed, lowercased name must be a non-empty token of
//!   `[a-z0-9!#$%&'*+.^_`|~-]`
//! - a bare CR or LF inside the value is rejected
//! - surrounding whitespace is stripped from the value, bytes that are not
//!   UTF-8 are read as ISO-8859-1
//!
//! A rejected line consumes nothing.

use std::str;

use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError};
use crate::utils::{CRLF, decode_text, find_crlf};

/// Outcome of decoding a single header section line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderLine {
    /// A field was stored, `consumed` includes the CRLF.
    Field { consumed: usize },
    /// The blank line ending the header section, always 2 bytes.
    End,
}

impl HeaderLine {
    pub(crate) fn consumed(self) -> usize {
        match self {
            HeaderLine::Field { consumed } => consumed,
            HeaderLine::End => CRLF.len(),
        }
    }
}

/// Decoder for request header lines.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeaderDecoder;

impl HeaderDecoder {
    /// Decodes the header line at the start of `src` into `headers`.
    ///
    /// Returns `Ok(None)` without touching `headers` when no complete line is buffered.
    pub(crate) fn decode(&mut self, headers: &mut Headers, src: &[u8]) -> Result<Option<HeaderLine>, ParseError> {
        let Some(end) = find_crlf(src) else {
            return Ok(None);
        };

        if end == 0 {
            return Ok(Some(HeaderLine::End));
        }

        let line = &src[..end];
        let colon = line.iter().position(|b| *b == b':').ok_or_else(|| ParseError::malformed_header("missing colon"))?;

        let raw_name = &line[..colon];
        ensure!(
            !raw_name.last().is_some_and(u8::is_ascii_whitespace),
            ParseError::malformed_header("whitespace between field name and colon")
        );

        let name = raw_name.trim_ascii();
        ensure!(!name.is_empty(), ParseError::malformed_header("empty field name"));
        ensure!(
            name.iter().all(|b| is_field_name_byte(b.to_ascii_lowercase())),
            ParseError::malformed_header(format!("invalid field name: {}", String::from_utf8_lossy(name)))
        );

        let raw_value = &line[colon + 1..];
        ensure!(
            !raw_value.iter().any(|b| matches!(b, b'\r' | b'\n')),
            ParseError::malformed_header("bare CR or LF in field value")
        );
        let value = decode_text(raw_value.trim_ascii());
        let value = value.as_ref();

        // the name is a verified ascii token, so this can't fail
        let name = str::from_utf8(name).map_err(ParseError::malformed_header)?;

        trace!(name, value, "decoded header field");
        headers.set(name, value);

        Ok(Some(HeaderLine::Field { consumed: end + CRLF.len() }))
    }
}

/// Whether `b` may appear in a lowercased header field name.
#[inline]
fn is_field_name_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

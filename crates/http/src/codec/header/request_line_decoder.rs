//! Request line parsing: `<METHOD> <target> HTTP/1.1\r\n`.

use crate::ensure;
use crate::protocol::{ParseError, RequestLine, RequestLineField};
use crate::utils::{CRLF, decode_text, find_crlf};

const VERSION_PREFIX: &str = "HTTP/";
const SUPPORTED_VERSION: &str = "1.1";

/// Parses the request line at the start of `src`.
///
/// # Returns
///
/// - `Ok(Some((line, consumed)))` where `consumed` includes the trailing CRLF
/// - `Ok(None)` if no complete line is buffered yet, nothing is consumed
/// - `Err(ParseError::MalformedRequestLine)` naming the offending field
pub(crate) fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(end) = find_crlf(src) else {
        return Ok(None);
    };

    let line = decode_text(&src[..end]);

    let parts = line.split_ascii_whitespace().collect::<Vec<_>>();
    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::malformed_request_line(
            RequestLineField::Line,
            format!("expect 3 parts but found {}", parts.len()),
        ));
    };

    ensure!(
        method.bytes().all(|b| b.is_ascii_uppercase()),
        ParseError::malformed_request_line(RequestLineField::Method, format!("incorrect method format: {method}"))
    );

    ensure!(
        target.starts_with('/'),
        ParseError::malformed_request_line(RequestLineField::Target, format!("target must start with '/': {target}"))
    );

    let version = version.strip_prefix(VERSION_PREFIX).ok_or_else(|| {
        ParseError::malformed_request_line(RequestLineField::Version, format!("invalid http version format: {version}"))
    })?;

    ensure!(
        version == SUPPORTED_VERSION,
        ParseError::malformed_request_line(RequestLineField::Version, format!("unsupported http version: {version}"))
    );

    let request_line =
        RequestLine { method: method.to_string(), target: target.to_string(), version: version.to_string() };

    Ok(Some((request_line, end + CRLF.len())))
}

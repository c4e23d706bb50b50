//! HTTP head processing: request line and header field decoding, status line
//! and header field encoding.
//!
//! # Components
//!
//! - [`parse_request_line`]: Parses `<METHOD> <target> HTTP/1.1`
//! - [`HeaderDecoder`]: Decodes one header field line at a time
//!   - Validates the field name charset
//!   - Combines repeated fields into a list value
//!
//! - [`StatusLineEncoder`]: Writes the response status line
//! - [`HeaderEncoder`]: Writes header and trailer field blocks

mod header_decoder;
mod header_encoder;
mod request_line_decoder;

pub(crate) use header_decoder::{HeaderDecoder, HeaderLine};
pub(crate) use header_encoder::{HeaderEncoder, StatusLineEncoder};
pub(crate) use request_line_decoder::parse_request_line;

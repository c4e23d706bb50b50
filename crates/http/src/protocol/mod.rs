//! Core HTTP protocol types.
//!
//! # Components
//!
//! - **Requests** ([`request`]): [`RequestLine`] and the assembled [`Request`]
//! - **Headers** ([`headers`]): [`Headers`], the case-insensitive field map shared by
//!   requests, responses and chunked trailers
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error of a connection
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response writing errors
//!
//! Status codes are taken from the [`http`] crate, see [`StatusCode`].

mod request;
pub use request::Request;
pub use request::RequestLine;

mod headers;
pub use headers::Headers;
pub use headers::Iter as HeadersIter;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::RequestLineField;
pub use error::SendError;

pub use http::StatusCode;

use std::error::Error;
use std::fmt;
use std::io;
use thiserror::Error;

use crate::connection::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },

    #[error("handler error: {cause}")]
    HandlerError { cause: Box<dyn Error + Send + Sync> },

    #[error("handler panicked: {message}")]
    HandlerPanic { message: String },
}

impl HttpError {
    pub fn handler<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::HandlerError { cause: e.into() }
    }

    pub fn handler_panic<S: ToString>(message: S) -> Self {
        Self::HandlerPanic { message: message.to_string() }
    }
}

/// The part of the request line a [`ParseError::MalformedRequestLine`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLineField {
    Line,
    Method,
    Target,
    Version,
}

impl fmt::Display for RequestLineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestLineField::Line => "line",
            RequestLineField::Method => "method",
            RequestLineField::Target => "target",
            RequestLineField::Version => "version",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line {field}: {reason}")]
    MalformedRequestLine { field: RequestLineField, reason: String },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("truncated body, expected {expected} bytes but stream ended after {received}")]
    TruncatedBody { expected: u64, received: u64 },

    #[error("request too large, buffered data would exceed the limit {max_size}")]
    RequestTooLarge { max_size: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(field: RequestLineField, str: S) -> Self {
        Self::MalformedRequestLine { field, reason: str.to_string() }
    }

    pub fn malformed_header<S: ToString>(str: S) -> Self {
        Self::MalformedHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn truncated_body(expected: u64, received: u64) -> Self {
        Self::TruncatedBody { expected, received }
    }

    pub fn request_too_large(max_size: usize) -> Self {
        Self::RequestTooLarge { max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    /// The writer was driven out of order, this is a bug in the calling handler.
    #[error("can't {operation} while the writer is in state {state:?}")]
    ProtocolStateViolation { operation: &'static str, state: WriterState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn state_violation(operation: &'static str, state: WriterState) -> Self {
        Self::ProtocolStateViolation { operation, state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    pub fn is_state_violation(&self) -> bool {
        matches!(self, Self::ProtocolStateViolation { .. })
    }
}

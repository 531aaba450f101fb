//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur while serving a connection.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The request did not fit in the configured buffer.
    #[error("Request exceeds {0} bytes")]
    RequestTooLarge(usize),

    /// A parameterized route could not be matched.
    #[error("Routing fault: {0}")]
    Routing(String),
}

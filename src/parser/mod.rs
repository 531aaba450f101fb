//! HTTP parser module.
//!
//! Turns the raw bytes of a single HTTP/1.x request into an [`HttpRequest`]:
//! request line, headers, and a body delimited by `Content-Length`.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

pub use request::{content_length, header_end, parse_request};

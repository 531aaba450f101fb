//! The TCP side: accepting connections, reading requests, writing responses.

mod config;
mod error;
mod http_server;
mod response;
mod shutdown;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
pub use response::{HttpResponse, StatusCode};
pub use shutdown::Shutdown;

//! A minimal HTTP router and a password hashing service built on it.
//!
//! The crate is split into small layers:
//!
//! - [`parser`]: HTTP/1.x request parsing, query strings and url-encoded forms
//! - [`router`]: exact and `/segment/:name` routes, pre/post middleware, the
//!   per-request [`Context`](router::Context)
//! - [`server`]: the tokio TCP server that feeds requests to a router
//! - [`store`]: the deferred-write store and the request duration log
//! - [`hasher`]: salted SHA-512 digests and random tokens
//! - [`app`]: the `/health`, `/hash`, `/stats` and `/shutdown` endpoints
//!
//! # Examples
//!
//! ## Routing
//!
//! ```
//! use hashgate::{parse_request, Context, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router
//!     .before(|ctx: &mut Context| ctx.response_mut().set_header("X-Served-By", "hashgate"))
//!     .get("/greet/:name", |ctx: &mut Context| {
//!         let greeting = format!("Hello, {}!", ctx.param("name"));
//!         ctx.text(StatusCode::Ok, greeting);
//!     });
//!
//! let request = parse_request(b"GET /greet/World HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
//! let response = router.dispatch(request);
//! assert_eq!(response.status, StatusCode::Ok);
//! assert_eq!(response.body, b"Hello, World!");
//! assert_eq!(response.header("X-Served-By"), Some("hashgate"));
//! ```
//!
//! ## Error handling
//!
//! ```
//! use hashgate::{parse_request, ParserError};
//!
//! let invalid_request = b"INVALID /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! match parse_request(invalid_request) {
//!     Ok(_) => println!("Request parsed successfully"),
//!     Err(ParserError::InvalidMethod(method)) => println!("Invalid method: {}", method),
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```
//!
//! ## Running the service
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hashgate::app::{build_router, AppState, HashConfig};
//! use hashgate::hasher::Sha512Hasher;
//! use hashgate::{HttpServer, ServerConfig, Shutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shutdown = Shutdown::new();
//!     let state = AppState::new(
//!         tokio::runtime::Handle::current(),
//!         Arc::new(Sha512Hasher::new()),
//!         HashConfig::default(),
//!         shutdown.clone(),
//!     );
//!     let server = HttpServer::new(ServerConfig::default(), build_router(Arc::new(state)), shutdown);
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod hasher;
pub mod parser;
pub mod router;
pub mod server;
pub mod store;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use router::{Context, Router};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, Shutdown, StatusCode};

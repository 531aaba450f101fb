//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::parser::{content_length, header_end, parse_request};
use crate::router::Router;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::shutdown::Shutdown;

/// An HTTP server driving a [`Router`].
///
/// Each connection gets its own task and carries exactly one request. The
/// router runs on the blocking pool, so a handler that blocks only ties up
/// its own thread.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    router: Arc<Router>,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a server for `router`, stopped by `shutdown` or Ctrl+C.
    pub fn new(config: ServerConfig, router: Router, shutdown: Shutdown) -> Self {
        Self {
            config,
            router: Arc::new(router),
            shutdown,
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown: Shutdown) {
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    shutdown.trigger();
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Handle a new connection.
    async fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        router: Arc<Router>,
        read_buffer_size: usize,
        tasks: &mut JoinSet<()>,
    ) {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::plain(
                    StatusCode::ServiceUnavailable,
                    "Server is at capacity, please try again later",
                );
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        tasks.spawn(async move {
            // Held until the connection is done.
            let _permit = permit;

            if let Err(e) = Self::handle_connection(&mut socket, router, read_buffer_size).await {
                warn!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Back off briefly after a failed accept, e.g. when out of file descriptors.
    async fn handle_connection_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Gave up on {len} connections after {shutdown_timeout:?}", len = tasks.len());
        }
        info!("Server shutdown complete");
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn start(&self) -> Result<(), Error> {
        self.router.log_routes();
        let listener = self.setup_listener().await?;
        Self::setup_ctrl_c_handler(self.shutdown.clone());
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener until shutdown.
    ///
    /// In-flight connections are given time to finish before this returns.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.shutdown.triggered() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            debug!("Accepted connection from {addr}");
                            Self::handle_new_connection(
                                socket,
                                addr,
                                Arc::clone(&semaphore),
                                Arc::clone(&self.router),
                                self.config.read_buffer_size,
                                &mut tasks,
                            ).await;
                        }
                        Err(e) => Self::handle_connection_error(e).await,
                    }
                }

                // Reap finished connections so the set stays small.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Read one request from `socket`, dispatch it, and write the response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: Arc<Router>,
        read_buffer_size: usize,
    ) -> Result<(), Error> {
        let raw = match read_request(socket, read_buffer_size).await {
            Ok(raw) => raw,
            Err(Error::RequestTooLarge(limit)) => {
                let response = HttpResponse::plain(StatusCode::PayloadTooLarge, "Request Too Large");
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::RequestTooLarge(limit));
            }
            Err(Error::ParseError(e)) => {
                let response = HttpResponse::plain(StatusCode::BadRequest, format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
            Err(e) => return Err(e),
        };
        if raw.is_empty() {
            return Ok(()); // Connection closed
        }

        let request = match parse_request(&raw) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::plain(StatusCode::BadRequest, format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        let method = request.method;
        let path = request.path.clone();
        let response = match tokio::task::spawn_blocking(move || router.dispatch(request)).await {
            Ok(response) => response,
            Err(e) => {
                error!("Handler for {method} {path} failed: {e}");
                HttpResponse::plain(StatusCode::InternalServerError, "Internal Server Error")
            }
        };
        debug!("{method} {path} -> {}", response.status.as_u16());

        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;

        Ok(())
    }
}

/// Read a full request: the header block plus `Content-Length` body bytes.
///
/// Returns an empty buffer if the peer closed before sending anything.
async fn read_request(socket: &mut (impl AsyncRead + Unpin), limit: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut expected: Option<usize> = None;

    loop {
        if let Some(total) = expected {
            if buf.len() >= total {
                break;
            }
        }

        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if buf.len() > limit {
            return Err(Error::RequestTooLarge(limit));
        }

        if expected.is_none() {
            if let Some((head_len, body_start)) = header_end(&buf) {
                let total = body_start + content_length(&buf[..head_len])?;
                if total > limit {
                    return Err(Error::RequestTooLarge(limit));
                }
                expected = Some(total);
            }
        }
    }

    Ok(buf)
}

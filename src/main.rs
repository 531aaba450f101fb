//! The hashgate server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hashgate::app::{build_router, AppState, HashConfig};
use hashgate::hasher::Sha512Hasher;
use hashgate::server::{HttpServer, ServerConfig, Shutdown};
use log::info;
use tokio::runtime::Handle;

#[derive(Parser, Debug)]
#[command(name = "hashgate", version, about = "Password hashing over HTTP")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "HASHGATE_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Maximum number of concurrent connections
    #[arg(long, env = "HASHGATE_MAX_CONNECTIONS", default_value_t = 1024)]
    max_connections: usize,

    /// Largest request accepted, in bytes
    #[arg(long, env = "HASHGATE_READ_BUFFER_SIZE", default_value_t = 8192)]
    read_buffer_size: usize,

    /// Delay before a submitted hash becomes readable, in milliseconds
    #[arg(long, env = "HASHGATE_HASH_DELAY_MS", default_value_t = 5000)]
    hash_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = ServerConfig {
        addr: args.addr,
        max_connections: args.max_connections,
        read_buffer_size: args.read_buffer_size,
    };
    let hash_config = HashConfig {
        delay: Duration::from_millis(args.hash_delay_ms),
        ..HashConfig::default()
    };

    let shutdown = Shutdown::new();
    let state = AppState::new(Handle::current(), Arc::new(Sha512Hasher::new()), hash_config, shutdown.clone());
    let server = HttpServer::new(config, build_router(Arc::new(state)), shutdown);

    server.start().await?;
    info!("Server stopped");

    Ok(())
}

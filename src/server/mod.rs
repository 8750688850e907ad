// Server module entry point
// Binds the listener, wires shutdown signals and runs the accept loop

pub mod accept_loop;
pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::Arc;
use tokio::sync::Notify;

pub use accept_loop::run_accept_loop;
pub use listener::create_listener;

use crate::config::{AppState, Config};
use crate::logger;

/// Serve until SIGINT/SIGTERM
pub async fn run(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = create_listener(addr)?;
    let state = Arc::new(AppState::new(cfg));

    logger::log_server_start(&addr, cfg);

    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&shutdown));

    run_accept_loop(listener, state, shutdown).await?;
    Ok(())
}

// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the connection counter is checked while draining
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Accept connections on `listener` until `shutdown` is notified.
///
/// The listener is dropped as soon as shutdown is requested, so no new
/// connections are accepted. The function then waits for connections already
/// being served to finish, for at most the configured connection timeout.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<SocketAddr> {
    let local_addr = listener.local_addr()?;
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);

    let perf = &state.config.performance;
    let limit = Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout));
    wait_for_connections(&active_connections, limit).await;

    logger::log_server_stop(&local_addr);
    Ok(local_addr)
}

/// Wait until `active` drops to zero or `limit` elapses
async fn wait_for_connections(active: &AtomicUsize, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;

    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Stopping with {remaining} connection(s) still open after {}s",
                limit.as_secs()
            ));
            return;
        }
        logger::log_debug(&format!("Draining {remaining} connection(s)"));
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

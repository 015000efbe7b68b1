// Server loop module
// Accepts connections forever, one task per connection

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop.
///
/// Accept errors (e.g. the process ran out of file descriptors) are logged
/// and the loop keeps going. There is no connection limit and no shutdown
/// path; the process runs until it is killed.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                handle_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}

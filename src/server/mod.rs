// Server module entry point
// Binds the listener and runs the accept loop

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::StartupError;

/// A bound, not yet running, file server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Validate `config` and bind its address.
    ///
    /// Must be called from within a Tokio runtime. On error nothing is left
    /// listening.
    pub fn bind(config: Config) -> Result<Self, StartupError> {
        let addr = config.get_socket_addr().map_err(StartupError::Address)?;
        let root = config.server.root.clone();
        let state =
            AppState::new(config).map_err(|source| StartupError::Root { path: root, source })?;
        let listener =
            create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the process is terminated
    pub async fn run(self) {
        start_server_loop(self.listener, self.state).await;
    }
}

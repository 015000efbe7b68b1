// Connection handling module
// Serves a single accepted TCP connection in its own task

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::http::NoCache;
use crate::logger::{self, AccessLogEntry};

/// Handle a single connection in a spawned task.
///
/// The request handler is wrapped in [`NoCache`] so the no-cache headers are
/// set on every response before hyper writes the head. Failures stay inside
/// the task; the accept loop never sees them.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let state = Arc::clone(&state);
            async move {
                let mut entry = AccessLogEntry::from_request(&peer_addr, &req);
                let response = handler::handle_request(req, state).await?;
                entry.finish(&response);
                logger::log_access(&entry);
                Ok::<_, Infallible>(response)
            }
        });

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder
            .serve_connection(io, NoCache::new(service))
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}

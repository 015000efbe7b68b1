//! Local development HTTP server.
//!
//! Serves the files under a root directory over plain HTTP/1.x, answers
//! `.js` files as `application/javascript`, and marks every response as
//! uncacheable (`Cache-Control: no-store, no-cache, must-revalidate`,
//! `Pragma: no-cache`, `Expires: 0`).
//!
//! ```no_run
//! # async fn run() -> Result<(), devserve::error::StartupError> {
//! let config = devserve::config::Config::load()?;
//! let server = devserve::server::Server::bind(config)?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

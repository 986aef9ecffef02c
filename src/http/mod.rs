//! HTTP server module with optional TLS.
//!
//! Two modes:
//! - **None** (default): plain HTTP, for development or behind a reverse proxy
//! - **Manual**: user-provided certificate and key files
//!
//! Both modes shut down gracefully on SIGTERM/SIGINT. Manual mode reloads
//! certificates on SIGHUP.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};

//! HTTP surface the host uses to drive discovery and alert checks

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::{build_router, run_server, ServerConfig};

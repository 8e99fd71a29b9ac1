//! Infrastructure layer - Framework wiring
//!
//! - HTTP server setup (server)
//! - Application state (state)

pub mod server;
pub mod state;

pub use state::AppState;

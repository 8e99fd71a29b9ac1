pub mod api;
pub mod api_docs;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod utils;

pub use infrastructure::server;
pub use infrastructure::AppState;

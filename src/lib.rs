pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod template;
pub mod ui;

pub use config::Config;
pub use routes::{AppState, router};

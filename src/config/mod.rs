pub mod app_config;
pub mod cli;

pub use app_config::{AppConfig, ServerConfig};
pub use cli::Cli;

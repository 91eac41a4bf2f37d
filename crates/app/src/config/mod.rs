//! Application configuration

use clap::Args;

pub mod api;
pub mod logging;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Backend connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

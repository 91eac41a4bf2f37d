//! Backend API Config

use clap::Args;

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront backend
    #[arg(long = "api-url", env = "STOREFRONT_API_URL")]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "STOREFRONT_HTTP_TIMEOUT_SECONDS", default_value_t = 30u64)]
    pub timeout_seconds: u64,

    /// ISO 4217 code of the storefront currency
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "BDT")]
    pub currency: String,
}

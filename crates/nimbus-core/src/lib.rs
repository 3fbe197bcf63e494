pub mod config;
pub mod error;
pub mod locale;

pub use config::{
    Config, GeocodingConfig, MapConfig, MapLayer, ParsePreferenceError, ProviderKind,
    SummaryConfig, TemperatureUnit, UiConfig, ValidationResult, WeatherConfig, WindSpeedUnit,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use locale::{Language, Strings, TextDirection};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Logs go to stderr so they never interleave with the dashboard on stdout.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Nimbus core initialized");
    Ok(())
}

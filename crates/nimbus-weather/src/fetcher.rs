use std::sync::Arc;

use nimbus_core::{Config, NetworkError, ProviderKind};
use tracing::instrument;

use crate::error::FetchError;
use crate::geocode::Geocoder;
use crate::open_meteo::OpenMeteoProvider;
use crate::provider::{SyntheticProvider, WeatherProvider};
use crate::types::WeatherSnapshot;

/// Geocode a city, then ask the provider for its weather.
///
/// Sequential and all-or-nothing: no retries, no caching, no partial snapshots.
#[derive(Clone)]
pub struct WeatherFetcher {
    geocoder: Geocoder,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherFetcher {
    pub fn new(geocoder: Geocoder, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { geocoder, provider }
    }

    /// Build the geocoder and the configured provider.
    pub fn from_config(config: &Config) -> Result<Self, NetworkError> {
        let geocoder = Geocoder::new(&config.geocoding)?;
        let provider: Arc<dyn WeatherProvider> = match config.weather.provider {
            ProviderKind::Synthetic => Arc::new(SyntheticProvider::new()),
            ProviderKind::OpenMeteo => Arc::new(OpenMeteoProvider::new(&config.weather)?),
        };
        tracing::info!("Weather provider: {}", provider.name());
        Ok(Self::new(geocoder, provider))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, query: &str) -> Result<WeatherSnapshot, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FetchError::BlankQuery);
        }

        let place = self.geocoder.search(query).await?;
        let snapshot = self.provider.conditions(&place).await?;

        if !snapshot.is_consistent() {
            tracing::warn!(
                "Provider {} returned out-of-range values for {}",
                self.provider.name(),
                snapshot.city
            );
        }
        Ok(snapshot)
    }
}

impl std::fmt::Debug for WeatherFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherFetcher")
            .field("geocoder", &self.geocoder)
            .field("provider", &self.provider.name())
            .finish()
    }
}

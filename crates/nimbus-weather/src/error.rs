//! Weather-specific error types.

use nimbus_core::{Language, NetworkError};
use thiserror::Error;

/// The city could not be resolved to coordinates.
#[derive(Error, Debug, Clone)]
pub enum GeocodingError {
    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Geocoding lookup failed: {0}")]
    Lookup(#[from] NetworkError),
}

impl GeocodingError {
    /// Localized message for the error banner.
    pub fn user_message(&self, lang: Language) -> &'static str {
        let strings = lang.strings();
        match self {
            Self::NotFound(_) => strings.city_not_found,
            Self::Lookup(_) => strings.lookup_failed,
        }
    }
}

/// A weather provider could not produce a snapshot.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Weather request failed: {0}")]
    Request(#[from] NetworkError),

    #[error("Invalid weather data: {0}")]
    InvalidData(String),
}

/// Failure of a complete search: geocoding followed by the provider call.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Search query is blank")]
    BlankQuery,

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl FetchError {
    /// Localized message for the error banner.
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            Self::Geocoding(e) => e.user_message(lang),
            Self::BlankQuery | Self::Provider(_) => lang.strings().error_finding_city,
        }
    }
}

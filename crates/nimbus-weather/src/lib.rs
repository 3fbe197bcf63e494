//! Weather data for Nimbus
//!
//! Resolves a city name through Nominatim, then asks a [`WeatherProvider`] for
//! current conditions and a seven-day forecast. Unit conversion for display
//! lives in [`units`].

pub mod error;
pub mod fetcher;
pub mod geocode;
pub mod open_meteo;
pub mod provider;
pub mod types;
pub mod units;

pub use error::{FetchError, GeocodingError, ProviderError};
pub use fetcher::WeatherFetcher;
pub use geocode::Geocoder;
pub use open_meteo::OpenMeteoProvider;
pub use provider::{SyntheticProvider, WeatherProvider};
pub use types::*;
pub use units::CardinalDirection;

//! Forward geocoding: convert a free-text city name to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use nimbus_core::{GeocodingConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::error::GeocodingError;
use crate::types::Place;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_place(self, query: &str) -> Result<Place, GeocodingError> {
        let latitude: f64 = self.lat.trim().parse().map_err(|_| {
            NetworkError::InvalidResponse(format!("unparsable latitude '{}'", self.lat))
        })?;
        let longitude: f64 = self.lon.trim().parse().map_err(|_| {
            NetworkError::InvalidResponse(format!("unparsable longitude '{}'", self.lon))
        })?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(NetworkError::InvalidResponse(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            ))
            .into());
        }

        // "London, Greater London, England, United Kingdom" -> "London"
        let name = self
            .display_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(query)
            .to_string();

        Ok(Place {
            name,
            latitude,
            longitude,
        })
    }
}

/// Client for the Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `query` to the first matching place.
    ///
    /// Issues exactly one request. Zero matches is [`GeocodingError::NotFound`];
    /// transport failures, error statuses and malformed bodies are
    /// [`GeocodingError::Lookup`].
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Place, GeocodingError> {
        let url = format!(
            "{}/search?format=json&q={}&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Geocoding request failed: {}", e);
            e.into_network_error()
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Geocoding returned status {}", status);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        let matches: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            tracing::warn!("Geocoding parse error: {}", e);
            NetworkError::InvalidResponse(e.to_string())
        })?;

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(query.to_string()))?;

        let place = first.into_place(query)?;
        tracing::info!(
            "Geocoded '{}' to {} ({}, {})",
            query,
            place.name,
            place.latitude,
            place.longitude
        );
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lat: &str, lon: &str, display_name: &str) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[test]
    fn test_first_display_name_segment_is_city() {
        let place = raw("51.5074", "-0.1278", "London, Greater London, England")
            .into_place("london")
            .unwrap();
        assert_eq!(place.name, "London");
        assert!((place.latitude - 51.5074).abs() < 1e-9);
        assert!((place.longitude + 0.1278).abs() < 1e-9);
    }

    #[test]
    fn test_blank_display_name_falls_back_to_query() {
        let place = raw("35.6892", "51.3890", " , Iran").into_place("Tehran").unwrap();
        assert_eq!(place.name, "Tehran");
    }

    #[test]
    fn test_unparsable_coordinates_are_lookup_errors() {
        let err = raw("north", "0", "Nowhere").into_place("x").unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::Lookup(NetworkError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let err = raw("91.0", "0", "Beyond").into_place("x").unwrap_err();
        assert!(matches!(err, GeocodingError::Lookup(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = GeocodingConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..GeocodingConfig::default()
        };
        let geocoder = Geocoder::new(&config).unwrap();
        assert_eq!(geocoder.base_url, "http://localhost:9999");
    }
}

//! Open-Meteo forecast provider. Free, no API key required.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use nimbus_core::{NetworkError, ReqwestErrorExt, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::error::ProviderError;
use crate::provider::WeatherProvider;
use crate::types::{
    clamp_percent, day_index, Condition, ForecastDay, Place, WeatherSnapshot,
    DEFAULT_DESCRIPTION_KEY, FORECAST_DAYS,
};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,cloud_cover,\
pressure_msl,wind_speed_10m,wind_direction_10m,precipitation";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max,uv_index_max";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    cloud_cover: f64,
    pressure_msl: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    #[serde(default)]
    precipitation: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    uv_index_max: Vec<Option<f64>>,
}

impl DailyBlock {
    fn day(&self, i: usize) -> Result<ForecastDay, ProviderError> {
        let missing = || ProviderError::InvalidData(format!("daily entry {} incomplete", i));

        let date = self.time.get(i).ok_or_else(missing)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ProviderError::InvalidData(format!("bad date '{}': {}", date, e)))?;

        Ok(ForecastDay {
            day: day_index(date.weekday()).to_string(),
            max_c: *self.temperature_2m_max.get(i).ok_or_else(missing)?,
            min_c: *self.temperature_2m_min.get(i).ok_or_else(missing)?,
            condition: Condition::from_wmo_code(*self.weather_code.get(i).ok_or_else(missing)?),
            rain_probability: self
                .precipitation_probability_max
                .get(i)
                .copied()
                .flatten()
                .map(clamp_percent)
                .unwrap_or(0),
        })
    }
}

impl ForecastResponse {
    fn into_snapshot(self, place: &Place) -> Result<WeatherSnapshot, ProviderError> {
        if self.daily.time.len() < FORECAST_DAYS {
            return Err(ProviderError::InvalidData(format!(
                "expected {} forecast days, got {}",
                FORECAST_DAYS,
                self.daily.time.len()
            )));
        }

        let mut days = Vec::with_capacity(FORECAST_DAYS);
        for i in 0..FORECAST_DAYS {
            days.push(self.daily.day(i)?);
        }
        let forecast: [ForecastDay; FORECAST_DAYS] = days
            .try_into()
            .map_err(|_| ProviderError::InvalidData("forecast length mismatch".into()))?;

        let current = self.current;
        let condition = Condition::from_wmo_code(current.weather_code);

        // Open-Meteo has no storm probability; use today's precipitation
        // probability when a thunderstorm is reported.
        let storm_chance = if condition == Condition::Stormy {
            forecast[0].rain_probability
        } else {
            0
        };

        let uv_index = self
            .daily
            .uv_index_max
            .first()
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
            .map(|v| v.round().clamp(0.0, 11.0) as u8)
            .unwrap_or(0);

        Ok(WeatherSnapshot {
            city: place.name.clone(),
            temperature_c: current.temperature_2m,
            condition,
            description_key: DEFAULT_DESCRIPTION_KEY.to_string(),
            humidity: clamp_percent(current.relative_humidity_2m),
            clouds: clamp_percent(current.cloud_cover),
            storm_chance,
            wind_speed_kmh: current.wind_speed_10m.max(0.0),
            wind_direction_deg: (current.wind_direction_10m.round() as i64).rem_euclid(360) as u16,
            pressure_hpa: current.pressure_msl,
            rain_mm: current.precipitation.max(0.0),
            uv_index,
            latitude: place.latitude,
            longitude: place.longitude,
            forecast,
        })
    }
}

/// Real weather provider backed by the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            base_url: config.open_meteo_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    #[instrument(skip_all, level = "info")]
    async fn conditions(&self, place: &Place) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("forecast_days", "7"),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Open-Meteo request failed: {}", e);
                e.into_network_error()
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Open-Meteo returned status {}", status);
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        let snapshot = body.into_snapshot(place)?;
        tracing::debug!(
            "Open-Meteo conditions for {}: {:.1}°C, {:?}",
            snapshot.city,
            snapshot.temperature_c,
            snapshot.condition
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tehran() -> Place {
        Place {
            name: "Tehran".to_string(),
            latitude: 35.6892,
            longitude: 51.389,
        }
    }

    fn forecast_body(days: usize, current_code: i32) -> serde_json::Value {
        // 2025-06-14 is a Saturday
        let time: Vec<String> = (0..days).map(|i| format!("2025-06-{}", 14 + i)).collect();
        json!({
            "current": {
                "temperature_2m": 31.4,
                "relative_humidity_2m": 18.0,
                "weather_code": current_code,
                "cloud_cover": 12.0,
                "pressure_msl": 1009.2,
                "wind_speed_10m": 14.8,
                "wind_direction_10m": 361.0,
                "precipitation": 0.0
            },
            "daily": {
                "time": time,
                "weather_code": vec![61; days],
                "temperature_2m_max": vec![33.0; days],
                "temperature_2m_min": vec![21.0; days],
                "precipitation_probability_max": vec![Some(55.0); days],
                "uv_index_max": vec![Some(9.7); days]
            }
        })
    }

    async fn provider_for(server: &MockServer) -> OpenMeteoProvider {
        OpenMeteoProvider::new(&WeatherConfig {
            open_meteo_url: server.uri(),
            ..WeatherConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_conditions_are_mapped_into_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "35.6892"))
            .and(query_param("forecast_days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7, 2)))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = provider_for(&server)
            .await
            .conditions(&tehran())
            .await
            .unwrap();

        assert!(snapshot.is_consistent());
        assert_eq!(snapshot.city, "Tehran");
        assert_eq!(snapshot.condition, Condition::PartlyCloudy);
        assert_eq!(snapshot.humidity, 18);
        assert_eq!(snapshot.wind_direction_deg, 1);
        assert_eq!(snapshot.uv_index, 10);
        assert_eq!(snapshot.storm_chance, 0);
        assert_eq!(snapshot.forecast[0].day, "0");
        assert_eq!(snapshot.forecast[6].day, "6");
        assert_eq!(snapshot.forecast[3].condition, Condition::Rainy);
        assert_eq!(snapshot.forecast[3].rain_probability, 55);
    }

    #[tokio::test]
    async fn test_thunderstorm_takes_storm_chance_from_today() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7, 95)))
            .mount(&server)
            .await;

        let snapshot = provider_for(&server)
            .await
            .conditions(&tehran())
            .await
            .unwrap();
        assert_eq!(snapshot.condition, Condition::Stormy);
        assert_eq!(snapshot.storm_chance, 55);
    }

    #[tokio::test]
    async fn test_short_forecast_is_invalid_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3, 0)))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .conditions(&tehran())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .conditions(&tehran())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Request(NetworkError::ServerError { status: 502, .. })
        ));
    }
}

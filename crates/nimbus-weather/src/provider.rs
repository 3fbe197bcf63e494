//! Weather providers.
//!
//! A provider turns a resolved [`Place`] into a [`WeatherSnapshot`]. The fetcher
//! only knows the trait, so the synthetic placeholder and a real service are
//! interchangeable.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ProviderError;
use crate::types::{Condition, ForecastDay, Place, WeatherSnapshot, DEFAULT_DESCRIPTION_KEY};

/// Source of current conditions and the seven-day forecast for a place.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    async fn conditions(&self, place: &Place) -> Result<WeatherSnapshot, ProviderError>;
}

/// Placeholder provider producing uniformly random readings.
///
/// Only the coordinates and the canonical city name come from the place; every
/// other value is drawn fresh on each call.
pub struct SyntheticProvider {
    rng: Mutex<fastrand::Rng>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Deterministic sequence, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    fn generate(&self, place: &Place) -> WeatherSnapshot {
        let mut rng = self.rng.lock();

        let temperature_c = f64::from(rng.u8(15..40));
        let condition = Condition::ALL[rng.usize(..3)];
        let humidity = rng.u8(20..80);
        let wind_speed_kmh = f64::from(rng.u8(5..50));
        let wind_direction_deg = rng.u16(0..360);
        let clouds = rng.u8(0..100);
        let rain_mm = rng.f64() * 10.0;
        let storm_chance = rng.u8(0..40);
        let uv_index = rng.u8(0..11);

        let forecast = std::array::from_fn(|i| ForecastDay {
            day: i.to_string(),
            max_c: f64::from(rng.u8(20..35)),
            min_c: f64::from(rng.u8(10..20)),
            condition: Condition::ALL[rng.usize(..Condition::ALL.len())],
            rain_probability: rng.u8(0..100),
        });

        WeatherSnapshot {
            city: place.name.clone(),
            temperature_c,
            condition,
            description_key: DEFAULT_DESCRIPTION_KEY.to_string(),
            humidity,
            clouds,
            storm_chance,
            wind_speed_kmh,
            wind_direction_deg,
            pressure_hpa: 1012.0,
            rain_mm,
            uv_index,
            latitude: place.latitude,
            longitude: place.longitude,
            forecast,
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn conditions(&self, place: &Place) -> Result<WeatherSnapshot, ProviderError> {
        let snapshot = self.generate(place);
        tracing::debug!(
            "Synthetic conditions for {}: {:.1}°C, {:?}",
            snapshot.city,
            snapshot.temperature_c,
            snapshot.condition
        );
        Ok(snapshot)
    }
}

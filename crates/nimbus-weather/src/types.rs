use nimbus_core::Strings;
use serde::{Deserialize, Serialize};

/// Number of entries in every forecast.
pub const FORECAST_DAYS: usize = 7;

/// Description key resolved through the locale tables at render time.
pub const DEFAULT_DESCRIPTION_KEY: &str = "weatherDesc";

/// Weather condition categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Clear,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Rainy,
        Condition::Stormy,
        Condition::Snowy,
    ];

    /// Convert a WMO weather code to a Condition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 | 1 => Self::Clear,
            2 => Self::PartlyCloudy,
            3 | 45 | 48 => Self::Cloudy,
            51..=67 | 80..=82 => Self::Rainy,
            71..=77 | 85 | 86 => Self::Snowy,
            95..=99 => Self::Stormy,
            _ => Self::Clear,
        }
    }

    /// Position in [`Condition::ALL`] and in the locale condition tables.
    pub fn index(self) -> usize {
        match self {
            Self::Clear => 0,
            Self::PartlyCloudy => 1,
            Self::Cloudy => 2,
            Self::Rainy => 3,
            Self::Stormy => 4,
            Self::Snowy => 5,
        }
    }

    pub fn label(self, strings: &Strings) -> &'static str {
        strings.conditions[self.index()]
    }

    /// English name, used in prompts and logs
    pub fn description(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Stormy => "Stormy",
            Self::Snowy => "Snowy",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁",
            Self::Rainy => "☂",
            Self::Stormy => "⚡",
            Self::Snowy => "❄",
        }
    }
}

/// A resolved geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One day of the seven-day forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Day-of-week index as text, "0" = Saturday
    pub day: String,
    pub max_c: f64,
    pub min_c: f64,
    pub condition: Condition,
    /// 0-100
    pub rain_probability: u8,
}

/// Current conditions plus forecast for one resolved city.
///
/// Stored in metric units; conversion happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub description_key: String,
    pub humidity: u8,
    pub clouds: u8,
    pub storm_chance: u8,
    pub wind_speed_kmh: f64,
    /// 0-359
    pub wind_direction_deg: u16,
    pub pressure_hpa: f64,
    pub rain_mm: f64,
    /// 0-11
    pub uv_index: u8,
    pub latitude: f64,
    pub longitude: f64,
    pub forecast: [ForecastDay; FORECAST_DAYS],
}

impl WeatherSnapshot {
    /// Check the range invariants every provider must uphold.
    pub fn is_consistent(&self) -> bool {
        let percentages_ok = [self.humidity, self.clouds, self.storm_chance]
            .iter()
            .chain(self.forecast.iter().map(|d| &d.rain_probability))
            .all(|p| *p <= 100);

        percentages_ok
            && self.wind_speed_kmh >= 0.0
            && self.wind_direction_deg < 360
            && self.rain_mm >= 0.0
            && self.uv_index <= 11
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Day index for a calendar date, Saturday = 0.
pub fn day_index(weekday: chrono::Weekday) -> usize {
    (weekday.num_days_from_sunday() as usize + 1) % 7
}

/// Clamp a percentage-like reading into 0..=100.
pub(crate) fn clamp_percent(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

//! Display-unit conversion.
//!
//! Snapshots are stored in °C and km/h. Everything here is pure and total, and
//! is evaluated on every render so a preference change shows up immediately.

use nimbus_core::{Strings, TemperatureUnit, WindSpeedUnit};

const KMH_TO_MPH: f64 = 0.621371;
const KMH_PER_MS: f64 = 3.6;

/// Celsius is passed through unchanged; Fahrenheit is rounded to a whole degree.
pub fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round(),
    }
}

/// km/h is rounded to an integer; mph and m/s keep one decimal place.
pub fn convert_speed(kmh: f64, unit: WindSpeedUnit) -> f64 {
    match unit {
        WindSpeedUnit::KilometersPerHour => kmh.round(),
        WindSpeedUnit::MilesPerHour => round1(kmh * KMH_TO_MPH),
        WindSpeedUnit::MetersPerSecond => round1(kmh / KMH_PER_MS),
    }
}

pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}", convert_temperature(celsius, unit))
}

pub fn format_speed(kmh: f64, unit: WindSpeedUnit) -> String {
    let value = convert_speed(kmh, unit);
    match unit {
        WindSpeedUnit::KilometersPerHour => format!("{:.0}", value),
        WindSpeedUnit::MilesPerHour | WindSpeedUnit::MetersPerSecond => format!("{:.1}", value),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One of the eight compass points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CardinalDirection {
    const ORDER: [CardinalDirection; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// `round(angle / 45) mod 8`; any finite angle wraps onto the compass.
    pub fn from_degrees(angle: f64) -> Self {
        if !angle.is_finite() {
            return Self::North;
        }
        let sector = ((angle / 45.0).round() as i64).rem_euclid(8) as usize;
        Self::ORDER[sector]
    }

    pub fn index(self) -> usize {
        Self::ORDER.iter().position(|d| *d == self).unwrap_or(0)
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }

    pub fn label(self, strings: &Strings) -> &'static str {
        strings.directions[self.index()]
    }

    /// Arrow pointing the way the gauge needle points for this bearing.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::North => "↑",
            Self::NorthEast => "↗",
            Self::East => "→",
            Self::SouthEast => "↘",
            Self::South => "↓",
            Self::SouthWest => "↙",
            Self::West => "←",
            Self::NorthWest => "↖",
        }
    }
}

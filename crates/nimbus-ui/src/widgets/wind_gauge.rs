use nimbus_weather::units::format_speed;
use nimbus_weather::{CardinalDirection, WeatherSnapshot};

use super::Widget;
use crate::state::DisplayPreferences;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindGaugeView {
    pub title: &'static str,
    pub speed: String,
    pub unit: &'static str,
    pub direction: CardinalDirection,
    pub direction_label: &'static str,
    pub degrees: u16,
}

impl WindGaugeView {
    pub fn build(snapshot: &WeatherSnapshot, prefs: DisplayPreferences) -> Self {
        let strings = prefs.language.strings();
        let direction = CardinalDirection::from_degrees(f64::from(snapshot.wind_direction_deg));

        Self {
            title: strings.wind_status,
            speed: format_speed(snapshot.wind_speed_kmh, prefs.wind_unit),
            unit: prefs.wind_unit.label(),
            direction,
            direction_label: direction.label(strings),
            degrees: snapshot.wind_direction_deg,
        }
    }
}

impl Widget for WindGaugeView {
    fn render(&self) -> Vec<String> {
        vec![
            self.title.to_string(),
            format!("{} {}", self.speed, self.unit),
            format!(
                "{} {} ({}°)",
                self.direction.arrow(),
                self.direction_label,
                self.degrees
            ),
        ]
    }
}

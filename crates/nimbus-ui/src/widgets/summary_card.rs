use chrono::{Datelike, NaiveDate};
use nimbus_weather::units::format_temperature;
use nimbus_weather::{day_index, WeatherSnapshot};

use super::{degrees, Widget};
use crate::state::DisplayPreferences;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// Headline card: city, date, temperature, condition and four stat cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCardView {
    pub city: String,
    pub date: String,
    pub temperature: String,
    pub condition: &'static str,
    pub glyph: &'static str,
    pub description: &'static str,
    pub stats: [StatCard; 4],
}

impl SummaryCardView {
    pub fn build(snapshot: &WeatherSnapshot, prefs: DisplayPreferences, today: NaiveDate) -> Self {
        let strings = prefs.language.strings();
        let unit = prefs.temperature_unit;

        Self {
            city: snapshot.city.clone(),
            date: format!(
                "{}, {}",
                strings.days[day_index(today.weekday())],
                today.format("%Y-%m-%d")
            ),
            temperature: degrees(
                &format_temperature(snapshot.temperature_c, unit),
                unit.symbol(),
            ),
            condition: snapshot.condition.label(strings),
            glyph: snapshot.condition.glyph(),
            description: strings.description(&snapshot.description_key),
            stats: [
                StatCard {
                    label: strings.humidity,
                    value: format!("{}%", snapshot.humidity),
                },
                StatCard {
                    label: strings.clouds,
                    value: format!("{}%", snapshot.clouds),
                },
                StatCard {
                    label: strings.storm_chance,
                    value: format!("{}%", snapshot.storm_chance),
                },
                StatCard {
                    label: strings.uv_index,
                    value: snapshot.uv_index.to_string(),
                },
            ],
        }
    }
}

impl Widget for SummaryCardView {
    fn render(&self) -> Vec<String> {
        let stats = self
            .stats
            .iter()
            .map(|s| format!("{}: {}", s.label, s.value))
            .collect::<Vec<_>>()
            .join(" | ");

        vec![
            format!("{}  ·  {}", self.city, self.date),
            format!("{} {}  {}", self.glyph, self.temperature, self.condition),
            self.description.to_string(),
            stats,
        ]
    }
}

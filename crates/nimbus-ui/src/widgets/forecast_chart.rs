use nimbus_weather::units::format_temperature;
use nimbus_weather::WeatherSnapshot;

use super::{degrees, Widget};
use crate::state::DisplayPreferences;

/// Width of the temperature range bar in cells.
pub const BAR_WIDTH: usize = 12;
/// Rain probability above which a day shows the rain glyph.
pub const RAINY_DAY_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastColumn {
    pub day: String,
    pub condition: &'static str,
    pub max: String,
    pub min: String,
    pub bar: String,
    pub rain_probability: u8,
    pub glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastChartView {
    pub title: &'static str,
    pub max_label: &'static str,
    pub min_label: &'static str,
    pub rain_label: &'static str,
    pub columns: Vec<ForecastColumn>,
}

impl ForecastChartView {
    pub fn build(snapshot: &WeatherSnapshot, prefs: DisplayPreferences) -> Self {
        let strings = prefs.language.strings();
        let unit = prefs.temperature_unit;

        let low = snapshot
            .forecast
            .iter()
            .map(|d| d.min_c)
            .fold(f64::INFINITY, f64::min);
        let high = snapshot
            .forecast
            .iter()
            .map(|d| d.max_c)
            .fold(f64::NEG_INFINITY, f64::max);

        let columns = snapshot
            .forecast
            .iter()
            .map(|day| ForecastColumn {
                day: strings.day_name(&day.day).to_string(),
                condition: day.condition.label(strings),
                max: degrees(&format_temperature(day.max_c, unit), unit.symbol()),
                min: degrees(&format_temperature(day.min_c, unit), unit.symbol()),
                bar: range_bar(day.min_c, day.max_c, low, high),
                rain_probability: day.rain_probability,
                glyph: if day.rain_probability > RAINY_DAY_THRESHOLD {
                    "☂"
                } else {
                    "☀"
                },
            })
            .collect();

        Self {
            title: strings.forecast_title,
            max_label: strings.max_temp,
            min_label: strings.min_temp,
            rain_label: strings.precip_prob,
            columns,
        }
    }
}

/// Bar covering `[min, max]` within the week's `[low, high]`.
fn range_bar(min: f64, max: f64, low: f64, high: f64) -> String {
    let span = high - low;
    if !span.is_finite() || span <= 0.0 {
        return "█".repeat(BAR_WIDTH);
    }

    let cell = |t: f64| (((t - low) / span) * BAR_WIDTH as f64).round() as usize;
    let start = cell(min.min(max)).min(BAR_WIDTH - 1);
    let end = cell(max.max(min)).clamp(start + 1, BAR_WIDTH);

    format!(
        "{}{}{}",
        "·".repeat(start),
        "█".repeat(end - start),
        "·".repeat(BAR_WIDTH - end)
    )
}

impl Widget for ForecastChartView {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![self.title.to_string()];
        lines.extend(self.columns.iter().map(|c| {
            format!(
                "{:<10} {} {} {:>5}  {} {:>5}  {}  {:>3}% {}",
                c.day,
                c.glyph,
                self.max_label,
                c.max,
                self.min_label,
                c.min,
                c.bar,
                c.rain_probability,
                self.rain_label
            )
        }));
        lines
    }
}

//! Dashboard widgets.
//!
//! Each widget is a view struct built purely from the snapshot and the display
//! preferences, plus a `render` that turns it into terminal lines.

pub mod forecast_chart;
pub mod map_panel;
pub mod summary_card;
pub mod wind_gauge;

pub use forecast_chart::{ForecastChartView, ForecastColumn};
pub use map_panel::MapPanelView;
pub use summary_card::{StatCard, SummaryCardView};
pub use wind_gauge::WindGaugeView;

/// Something that can be drawn as a block of text lines.
pub trait Widget {
    fn render(&self) -> Vec<String>;
}

/// `"{value}°{symbol}"`
pub(crate) fn degrees(value: &str, symbol: &str) -> String {
    format!("{}°{}", value, symbol)
}

//! Background work for the dashboard.
//! Network calls run as tokio tasks; results come back as [`DashboardMessage`]s.

pub mod summary_service;
pub mod weather_service;

use nimbus_summary::Ticket;
use nimbus_weather::{FetchError, WeatherSnapshot};

pub use summary_service::request_summary;
pub use weather_service::request_search;

/// Messages sent from async operations back to the dashboard
#[derive(Debug)]
pub enum DashboardMessage {
    /// Result of the search started for `generation`
    SearchDone {
        generation: u64,
        result: Result<WeatherSnapshot, FetchError>,
    },
    /// Narrative produced for `ticket`
    SummaryDone { ticket: Ticket, text: String },
}

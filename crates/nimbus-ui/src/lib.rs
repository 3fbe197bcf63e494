//! Terminal presentation for Nimbus
//!
//! An immutable [`DashboardState`] driven by the [`Dashboard`] controller,
//! text widgets, the owned [`MapOverlay`] and the background services that
//! report back over a channel.

pub mod dashboard;
pub mod map;
pub mod services;
pub mod state;
pub mod widgets;

pub use dashboard::Dashboard;
pub use map::{HeadlessMap, LatLon, MapBackend, MapError, MapLifecycle, MapOverlay, TileCoord};
pub use services::DashboardMessage;
pub use state::{DashboardState, DisplayPreferences, Phase, Preference, SummaryView};

//! Dashboard state machine.
//!
//! [`DashboardState`] is a plain value. Every transition consumes it and
//! returns the next state, so a state can always be rendered without locks.

use nimbus_core::{Language, MapLayer, TemperatureUnit, UiConfig, WindSpeedUnit};
use nimbus_summary::{SnapshotId, SummaryKey};
use nimbus_weather::{FetchError, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the narrative area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryView {
    #[default]
    Empty,
    Loading,
    Ready(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayPreferences {
    pub language: Language,
    pub temperature_unit: TemperatureUnit,
    pub wind_unit: WindSpeedUnit,
    pub map_layer: MapLayer,
}

impl DisplayPreferences {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            language: ui.language,
            temperature_unit: ui.temperature_unit,
            wind_unit: ui.wind_unit,
            map_layer: ui.map_layer,
        }
    }

    pub fn apply(self, preference: Preference) -> Self {
        match preference {
            Preference::Language(language) => Self { language, ..self },
            Preference::TemperatureUnit(temperature_unit) => Self {
                temperature_unit,
                ..self
            },
            Preference::WindSpeedUnit(wind_unit) => Self { wind_unit, ..self },
            Preference::MapLayer(map_layer) => Self { map_layer, ..self },
        }
    }
}

/// A single preference change from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Language(Language),
    TemperatureUnit(TemperatureUnit),
    WindSpeedUnit(WindSpeedUnit),
    MapLayer(MapLayer),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    phase: Phase,
    query: String,
    snapshot: Option<WeatherSnapshot>,
    snapshot_id: Option<SnapshotId>,
    last_snapshot_id: SnapshotId,
    error: Option<FetchError>,
    summary: SummaryView,
    preferences: DisplayPreferences,
    search_generation: u64,
}

impl DashboardState {
    pub fn new(preferences: DisplayPreferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    /// Enter `Loading` for a new query. Blank queries leave the state untouched.
    pub fn start_search(self, query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return self;
        }

        Self {
            phase: Phase::Loading,
            query: query.to_string(),
            snapshot: None,
            snapshot_id: None,
            error: None,
            summary: SummaryView::Empty,
            search_generation: self.search_generation + 1,
            ..self
        }
    }

    pub fn search_succeeded(self, snapshot: WeatherSnapshot) -> Self {
        let id = self.last_snapshot_id.next();
        Self {
            phase: Phase::Ready,
            snapshot: Some(snapshot),
            snapshot_id: Some(id),
            last_snapshot_id: id,
            error: None,
            summary: SummaryView::Empty,
            ..self
        }
    }

    pub fn search_failed(self, error: &FetchError) -> Self {
        Self {
            phase: Phase::Error,
            snapshot: None,
            snapshot_id: None,
            error: Some(error.clone()),
            summary: SummaryView::Empty,
            ..self
        }
    }

    pub fn set_preference(self, preference: Preference) -> Self {
        Self {
            preferences: self.preferences.apply(preference),
            ..self
        }
    }

    pub fn summary_started(self) -> Self {
        if self.snapshot.is_none() {
            return self;
        }
        Self {
            summary: SummaryView::Loading,
            ..self
        }
    }

    pub fn summary_finished(self, text: String) -> Self {
        if self.snapshot.is_none() {
            return self;
        }
        Self {
            summary: SummaryView::Ready(text),
            ..self
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn snapshot_id(&self) -> Option<SnapshotId> {
        self.snapshot_id
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    pub fn preferences(&self) -> DisplayPreferences {
        self.preferences
    }

    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }

    /// Error banner in the current language.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error
            .as_ref()
            .map(|e| e.user_message(self.preferences.language))
    }

    /// Combination the narrative should currently describe, if any.
    pub fn summary_key(&self) -> Option<SummaryKey> {
        self.snapshot_id
            .map(|id| SummaryKey::new(id, self.preferences.language))
    }
}

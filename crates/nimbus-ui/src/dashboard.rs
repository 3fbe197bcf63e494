//! Dashboard controller.
//!
//! Owns the state value, the map resource and the message channel. Commands
//! and background results both go through here on a single task; after each
//! change the summary and map effects are re-evaluated.

use chrono::{DateTime, Local, NaiveDate, Utc};
use nimbus_core::{MapConfig, TextDirection};
use nimbus_summary::{Begin, Summarizer, SummaryTracker};
use nimbus_weather::WeatherFetcher;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::map::{HeadlessMap, LatLon, MapBackend, MapOverlay};
use crate::services::{request_search, request_summary, DashboardMessage};
use crate::state::{DashboardState, DisplayPreferences, Phase, Preference, SummaryView};
use crate::widgets::{ForecastChartView, MapPanelView, SummaryCardView, Widget, WindGaugeView};

const RULE: &str = "────────────────────────────────────────────────────────";
const RLM: char = '\u{200F}';

pub struct Dashboard<B: MapBackend = HeadlessMap> {
    state: DashboardState,
    fetcher: WeatherFetcher,
    summarizer: Summarizer,
    tracker: SummaryTracker,
    map: MapOverlay<B>,
    tx: UnboundedSender<DashboardMessage>,
    rx: UnboundedReceiver<DashboardMessage>,
    started: bool,
}

impl<B: MapBackend> Dashboard<B> {
    pub fn new(
        fetcher: WeatherFetcher,
        summarizer: Summarizer,
        map_backend: B,
        map_config: MapConfig,
        preferences: DisplayPreferences,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: DashboardState::new(preferences),
            fetcher,
            summarizer,
            tracker: SummaryTracker::new(),
            map: MapOverlay::new(map_backend, map_config),
            tx,
            rx,
            started: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn map(&self) -> &MapOverlay<B> {
        &self.map
    }

    /// Search the language's default city. Only the first call does anything.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let city = self.state.preferences().language.default_city();
        tracing::info!("Initial search for {}", city);
        self.submit_search(city);
    }

    /// Begin a search. Returns `false` for a blank query, which changes nothing.
    pub fn submit_search(&mut self, query: &str) -> bool {
        let generation = self.state.search_generation();
        self.transition(|s| s.start_search(query));
        if self.state.search_generation() == generation {
            return false;
        }
        // Mark the app as started so a later start() never searches again.
        self.started = true;

        self.tracker.cancel_pending();
        request_search(
            &self.tx,
            self.fetcher.clone(),
            self.state.search_generation(),
            self.state.query().to_string(),
        );
        self.run_effects();
        true
    }

    pub fn set_preference(&mut self, preference: Preference) {
        self.transition(|s| s.set_preference(preference));
        self.run_effects();
    }

    /// Wait for the next background result.
    pub async fn next_message(&mut self) -> Option<DashboardMessage> {
        self.rx.recv().await
    }

    /// Take a background result if one is ready.
    pub fn try_next_message(&mut self) -> Option<DashboardMessage> {
        self.rx.try_recv().ok()
    }

    pub fn handle_message(&mut self, message: DashboardMessage) {
        match message {
            DashboardMessage::SearchDone { generation, result } => {
                if generation != self.state.search_generation() {
                    tracing::debug!(
                        "Ignoring result of superseded search {} (current {})",
                        generation,
                        self.state.search_generation()
                    );
                    return;
                }
                match result {
                    Ok(snapshot) => {
                        tracing::info!("Weather ready for {}", snapshot.city);
                        self.transition(|s| s.search_succeeded(snapshot));
                    }
                    Err(e) => self.transition(|s| s.search_failed(&e)),
                }
            }
            DashboardMessage::SummaryDone { ticket, text } => {
                if let Some(text) = self.tracker.complete(ticket, text) {
                    self.transition(|s| s.summary_finished(text));
                }
            }
        }
        self.run_effects();
    }

    /// Whether a search or summary is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.state.is_loading() || self.tracker.is_pending()
    }

    /// Release the map. Further renders still work; the map panel disappears.
    pub fn shutdown(&mut self) {
        self.map.dispose();
    }

    fn transition(&mut self, f: impl FnOnce(DashboardState) -> DashboardState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }

    fn run_effects(&mut self) {
        self.summary_effect();
        self.map_effect();
    }

    /// Keep the narrative in step with (snapshot, language).
    fn summary_effect(&mut self) {
        let Some(key) = self.state.summary_key() else {
            return;
        };

        match self.tracker.begin(key) {
            Begin::Request(ticket) => {
                let Some(snapshot) = self.state.snapshot().cloned() else {
                    return;
                };
                self.transition(|s| s.summary_started());
                request_summary(
                    &self.tx,
                    self.summarizer.clone(),
                    ticket,
                    snapshot,
                    key.language,
                );
            }
            Begin::Cached(text) => {
                if self.state.summary() != &SummaryView::Ready(text.clone()) {
                    self.transition(|s| s.summary_finished(text));
                }
            }
            Begin::InFlight => {}
        }
    }

    fn map_effect(&mut self) {
        let Some(snapshot) = self.state.snapshot() else {
            return;
        };
        let center = LatLon::new(snapshot.latitude, snapshot.longitude);
        let layer = self.state.preferences().map_layer;

        if let Err(e) = self.map.sync(center, layer, Utc::now()) {
            tracing::warn!("Map update skipped: {}", e);
        }
    }

    /// Render the whole dashboard for the current moment.
    pub fn render(&self) -> String {
        self.render_at(Local::now().date_naive(), Utc::now())
    }

    /// Render for a fixed date and time. Same inputs, same output.
    pub fn render_at(&self, today: NaiveDate, now: DateTime<Utc>) -> String {
        let prefs = self.state.preferences();
        let strings = prefs.language.strings();
        let mut lines: Vec<String> = vec![
            format!("{} · {}", strings.title, strings.subtitle),
            RULE.to_string(),
        ];

        if let Some(banner) = self.state.error_message() {
            lines.push(format!("⚠ {}", banner));
        }

        match (self.state.phase(), self.state.snapshot()) {
            (Phase::Loading, _) => lines.push(strings.loading.to_string()),
            (_, Some(snapshot)) => {
                lines.extend(SummaryCardView::build(snapshot, prefs, today).render());
                lines.push(RULE.to_string());
                lines.extend(WindGaugeView::build(snapshot, prefs).render());
                lines.push(RULE.to_string());

                lines.push(format!("✦ {}", strings.ai_analysis));
                match self.state.summary() {
                    SummaryView::Ready(text) => lines.extend(text.lines().map(str::to_string)),
                    SummaryView::Loading | SummaryView::Empty => {
                        lines.push(strings.analyzing.to_string())
                    }
                }
                lines.push(RULE.to_string());

                if let Some((_, zoom)) = self.map.view() {
                    let panel = MapPanelView::build(snapshot, prefs, self.map.config(), zoom, now);
                    lines.extend(panel.render());
                    lines.push(RULE.to_string());
                }

                lines.extend(ForecastChartView::build(snapshot, prefs).render());
            }
            (_, None) => {}
        }

        lines.push(RULE.to_string());
        lines.push(strings.footer.to_string());

        let rtl = prefs.language.direction() == TextDirection::Rtl;
        lines
            .into_iter()
            .map(|line| if rtl { format!("{}{}", RLM, line) } else { line })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use nimbus_core::{GeocodingConfig, Language};
    use nimbus_summary::{SummarizationError, TextGenerator};
    use nimbus_weather::{Geocoder, SyntheticProvider};

    struct Silent;

    #[async_trait]
    impl TextGenerator for Silent {
        async fn generate(&self, _prompt: &str) -> Result<String, SummarizationError> {
            Err(SummarizationError::EmptyResponse)
        }
    }

    fn dashboard(language: Language) -> Dashboard {
        let geocoder = Geocoder::new(&GeocodingConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..GeocodingConfig::default()
        })
        .unwrap();
        Dashboard::new(
            WeatherFetcher::new(geocoder, Arc::new(SyntheticProvider::with_seed(5))),
            Summarizer::new(Arc::new(Silent)),
            HeadlessMap::new(),
            MapConfig::default(),
            DisplayPreferences {
                language,
                ..DisplayPreferences::default()
            },
        )
    }

    #[tokio::test]
    async fn blank_submit_changes_nothing() {
        let mut dash = dashboard(Language::English);
        assert!(!dash.submit_search("   "));
        assert_eq!(dash.state().phase(), Phase::Idle);
        assert!(dash.try_next_message().is_none());
    }

    #[tokio::test]
    async fn start_searches_default_city_once() {
        let mut dash = dashboard(Language::Arabic);
        dash.start();
        assert_eq!(dash.state().query(), "القاهرة");
        assert_eq!(dash.state().search_generation(), 1);

        dash.start();
        assert_eq!(dash.state().search_generation(), 1);
    }

    #[tokio::test]
    async fn loading_render_shows_loading_line() {
        let mut dash = dashboard(Language::English);
        dash.submit_search("London");
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let text = dash.render_at(today, Utc::now());
        assert!(text.contains("Fetching weather data..."));
    }

    #[tokio::test]
    async fn rtl_lines_carry_direction_mark() {
        let dash = dashboard(Language::Persian);
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let text = dash.render_at(today, Utc::now());
        assert!(text.lines().all(|l| l.starts_with(RLM)));

        let dash = dashboard(Language::English);
        assert!(!dash.render_at(today, Utc::now()).contains(RLM));
    }
}

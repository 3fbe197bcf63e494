use std::sync::Arc;

use nimbus_core::Language;
use nimbus_weather::WeatherSnapshot;

use crate::client::TextGenerator;
use crate::prompt::build_prompt;

/// Shown when the service answers without any text.
pub const UNAVAILABLE_FALLBACK: &str = "Analysis not available.";
/// Shown for any other failure.
pub const ERROR_FALLBACK: &str = "Error communicating with AI for analysis.";

/// Produces a narrative for a snapshot. Never fails; errors become fallback text.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn summarize(&self, snapshot: &WeatherSnapshot, lang: Language) -> String {
        let prompt = build_prompt(snapshot, lang);

        match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => UNAVAILABLE_FALLBACK.to_string(),
            Err(e) if e.is_empty_response() => {
                tracing::warn!("Summary for {} came back empty", snapshot.city);
                UNAVAILABLE_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::warn!("Summary for {} failed: {}", snapshot.city, e);
                ERROR_FALLBACK.to_string()
            }
        }
    }
}

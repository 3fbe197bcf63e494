//! Summary backend: ask the text generator off the command loop.

use nimbus_core::Language;
use nimbus_summary::{Summarizer, Ticket};
use nimbus_weather::WeatherSnapshot;
use tokio::sync::mpsc::UnboundedSender;

use super::DashboardMessage;

/// Spawn a summary request. Always answers with `SummaryDone`; failures
/// arrive as fallback text.
pub fn request_summary(
    tx: &UnboundedSender<DashboardMessage>,
    summarizer: Summarizer,
    ticket: Ticket,
    snapshot: WeatherSnapshot,
    language: Language,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let text = summarizer.summarize(&snapshot, language).await;
        if tx
            .send(DashboardMessage::SummaryDone { ticket, text })
            .is_err()
        {
            tracing::debug!("Dashboard gone before summary {:?} finished", ticket);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use nimbus_summary::{
        Begin, SnapshotId, SummarizationError, SummaryKey, SummaryTracker, TextGenerator,
    };
    use nimbus_weather::{Condition, ForecastDay, DEFAULT_DESCRIPTION_KEY};

    struct Fixed;

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, SummarizationError> {
            Ok("Mild and dry".into())
        }
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "London".into(),
            temperature_c: 18.0,
            condition: Condition::Clear,
            description_key: DEFAULT_DESCRIPTION_KEY.into(),
            humidity: 40,
            clouds: 10,
            storm_chance: 0,
            wind_speed_kmh: 12.0,
            wind_direction_deg: 90,
            pressure_hpa: 1012.0,
            rain_mm: 0.0,
            uv_index: 4,
            latitude: 51.5074,
            longitude: -0.1278,
            forecast: std::array::from_fn(|i| ForecastDay {
                day: i.to_string(),
                max_c: 22.0,
                min_c: 12.0,
                condition: Condition::Clear,
                rain_probability: 5,
            }),
        }
    }

    fn ticket() -> Ticket {
        let mut tracker = SummaryTracker::new();
        match tracker.begin(SummaryKey::new(SnapshotId::new(1), Language::English)) {
            Begin::Request(ticket) => ticket,
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn summary_reports_back_with_ticket() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let ticket = ticket();

        request_summary(
            &tx,
            Summarizer::new(Arc::new(Fixed)),
            ticket,
            snapshot(),
            Language::English,
        );

        match rx.recv().await {
            Some(DashboardMessage::SummaryDone { ticket: got, text }) => {
                assert_eq!(got, ticket);
                assert_eq!(text, "Mild and dry");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_channel_is_tolerated() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);

        request_summary(
            &tx,
            Summarizer::new(Arc::new(Fixed)),
            ticket(),
            snapshot(),
            Language::English,
        );

        // The task finishes quietly; nothing is left to receive.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(tx.is_closed());
    }
}

//! Weather backend: geocode and fetch off the command loop.

use nimbus_weather::WeatherFetcher;
use tokio::sync::mpsc::UnboundedSender;

use super::DashboardMessage;

/// Spawn a search for `query`. Sends `SearchDone` tagged with `generation`.
pub fn request_search(
    tx: &UnboundedSender<DashboardMessage>,
    fetcher: WeatherFetcher,
    generation: u64,
    query: String,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fetcher.fetch(&query).await;
        if let Err(e) = &result {
            tracing::warn!("Search for '{}' failed: {}", query, e);
        }
        if tx
            .send(DashboardMessage::SearchDone { generation, result })
            .is_err()
        {
            tracing::debug!("Dashboard gone before search for '{}' finished", query);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use nimbus_core::GeocodingConfig;
    use nimbus_weather::{FetchError, Geocoder, SyntheticProvider};

    #[tokio::test]
    async fn blank_search_reports_back_with_generation() {
        let geocoder = Geocoder::new(&GeocodingConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..GeocodingConfig::default()
        })
        .unwrap();
        let fetcher = WeatherFetcher::new(geocoder, Arc::new(SyntheticProvider::with_seed(1)));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        request_search(&tx, fetcher, 7, "  ".into());

        match rx.recv().await {
            Some(DashboardMessage::SearchDone { generation, result }) => {
                assert_eq!(generation, 7);
                assert!(matches!(result, Err(FetchError::BlankQuery)));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

//! Text-generation client (Gemini `generateContent`).

use async_trait::async_trait;
use nimbus_core::{NetworkError, ReqwestErrorExt, SummaryConfig};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::error::SummarizationError;

/// A service that turns a prompt into prose.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizationError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Credentials are resolved here; a missing key only fails at request time.
    pub fn new(config: &SummaryConfig) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<String, SummarizationError> {
        let status = response.status();

        if status.is_success() {
            let body: GenerateResponse = response
                .json()
                .await
                .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
            body.text().ok_or(SummarizationError::EmptyResponse)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(SummarizationError::MissingCredentials)
        } else if status.is_server_error() {
            Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }
            .into())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(SummarizationError::Api(format!("{}: {}", status, text)))
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, level = "info")]
    async fn generate(&self, prompt: &str) -> Result<String, SummarizationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizationError::MissingCredentials)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(
            "Requesting summary from {} ({} prompt chars)",
            self.model,
            prompt.chars().count()
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(&SummaryConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            ..SummaryConfig::default()
        })
        .unwrap()
    }

    fn text_body(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
        json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        })
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_joins_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "hello" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body(&[
                "Sunny and warm. ",
                "Drink water.",
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server, Some("test-key"))
            .generate("hello")
            .await
            .unwrap();
        assert_eq!(text, "Sunny and warm. Drink water.");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body(&["x"])))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient {
            api_key: None,
            ..client_for(&server, None)
        };
        assert!(!client.has_credentials());
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, SummarizationError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("k"))
            .generate("hello")
            .await
            .unwrap_err();
        assert!(err.is_empty_response());
    }

    #[tokio::test]
    async fn test_client_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("k"))
            .generate("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizationError::Api(ref m) if m.contains("bad model")));
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("k"))
            .generate("hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizationError::Network(NetworkError::ServerError { status: 503, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = GeminiClient::new(&SummaryConfig {
            api_key: Some("secret".into()),
            ..SummaryConfig::default()
        })
        .unwrap();
        assert!(!format!("{:?}", client).contains("secret"));
    }
}

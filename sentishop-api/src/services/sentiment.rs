//! Sentiment analysis adapter
//!
//! Scores review text with a hosted text-classification model. The
//! inference API answers with a nested ranked list
//! (`[[{"label": "POSITIVE", "score": 0.99}, ...]]`); the first entry of the
//! first list is the result.

use async_trait::async_trait;
use sentishop_common::{Error, Result};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{build_http_client, send_with_retry, LabelScore};

/// Top-ranked sentiment for a piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Score `text`, returning the top-ranked label and its confidence
    async fn analyze(&self, text: &str) -> Result<Sentiment>;
}

/// Hugging Face inference API client
pub struct HuggingFaceSentiment {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HuggingFaceSentiment {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = build_http_client(timeout)
            .map_err(|e| Error::Internal(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    fn request(&self, text: &str) -> reqwest::RequestBuilder {
        let request = self.http_client.post(&self.url).json(&json!({ "inputs": text }));
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for HuggingFaceSentiment {
    async fn analyze(&self, text: &str) -> Result<Sentiment> {
        let response = send_with_retry("sentiment", || self.request(text))
            .await
            .map_err(|e| Error::Sentiment(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sentiment(format!("API error {}: {}", status.as_u16(), body)));
        }

        let ranked: Vec<Vec<LabelScore>> = response
            .json()
            .await
            .map_err(|e| Error::Sentiment(format!("Malformed response: {}", e)))?;

        let top = ranked
            .into_iter()
            .next()
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::Sentiment("Empty result list".to_string()))?;

        debug!(label = %top.label, score = top.score, "Sentiment scored");

        Ok(Sentiment {
            label: top.label,
            score: top.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_server;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    fn client(base: &str, key: &str) -> HuggingFaceSentiment {
        HuggingFaceSentiment::new(base, key, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_takes_first_ranked_result() {
        let router = Router::new().route(
            "/",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(body["inputs"], "Very nice shirt");
                assert_eq!(headers["authorization"], "Bearer hf_test");
                Json(json!([[
                    {"label": "POSITIVE", "score": 0.99986732006073},
                    {"label": "NEGATIVE", "score": 0.00013}
                ]]))
            }),
        );
        let base = test_server::spawn(router).await;

        let sentiment = client(&base, "hf_test").analyze("Very nice shirt").await.unwrap();

        assert_eq!(sentiment.label, "POSITIVE");
        assert!(sentiment.score > 0.0 && sentiment.score <= 1.0);
    }

    #[tokio::test]
    async fn test_empty_result_is_error() {
        let router = Router::new().route("/", post(|| async { Json(json!([[]])) }));
        let base = test_server::spawn(router).await;

        let err = client(&base, "").analyze("text").await.unwrap_err();
        assert!(matches!(err, Error::Sentiment(_)));
    }

    #[tokio::test]
    async fn test_malformed_response_is_error() {
        let router = Router::new().route(
            "/",
            post(|| async { Json(json!({"error": "Model is loading"})) }),
        );
        let base = test_server::spawn(router).await;

        let err = client(&base, "").analyze("text").await.unwrap_err();
        assert!(err.to_string().contains("Malformed response"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let router = Router::new().route(
            "/",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad token") }),
        );
        let base = test_server::spawn(router).await;

        let err = client(&base, "wrong").analyze("text").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        let err = client("http://127.0.0.1:9", "")
            .analyze("text")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Sentiment(_)));
    }
}

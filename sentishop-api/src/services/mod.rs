//! External inference adapters
//!
//! Both adapters call hosted models over HTTP. Each call carries the
//! client's timeout and is retried once on a transport error or 5xx.

pub mod image_classifier;
pub mod sentiment;

pub use image_classifier::{preprocess, HttpImageClassifier, ImageClassifier, ImageTensor};
pub use sentiment::{HuggingFaceSentiment, Sentiment, SentimentAnalyzer};

use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("sentishop/", env!("CARGO_PKG_VERSION"));

/// One entry of a ranked classification result
#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Send the request built by `build`, retrying once on failure
///
/// A 5xx response or transport error triggers the retry; whatever the
/// second attempt returns is handed back as is.
pub(crate) async fn send_with_retry<F>(
    service: &'static str,
    build: F,
) -> reqwest::Result<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    match build().send().await {
        Ok(response) if !response.status().is_server_error() => Ok(response),
        Ok(response) => {
            warn!(service, status = %response.status(), "Inference service error, retrying once");
            build().send().await
        }
        Err(e) => {
            warn!(service, error = %e, "Inference request failed, retrying once");
            build().send().await
        }
    }
}

/// Minimal HTTP fakes for adapter tests
#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;

    /// Serve `router` on an ephemeral local port and return its base URL
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn flaky(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }

    async fn always_down(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
        hits.fetch_add(1, Ordering::SeqCst);
        StatusCode::BAD_GATEWAY
    }

    async fn rejected(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
        hits.fetch_add(1, Ordering::SeqCst);
        StatusCode::UNAUTHORIZED
    }

    async fn hit_count(handler: axum::routing::MethodRouter<Arc<AtomicUsize>>) -> (u16, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new().route("/", handler).with_state(hits.clone());
        let base = test_server::spawn(router).await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let response = send_with_retry("test", || client.get(&base)).await.unwrap();
        (response.status().as_u16(), hits.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_retries_once_after_server_error() {
        assert_eq!(hit_count(get(flaky)).await, (200, 2));
    }

    #[tokio::test]
    async fn test_gives_up_after_second_failure() {
        assert_eq!(hit_count(get(always_down)).await, (502, 2));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        assert_eq!(hit_count(get(rejected)).await, (401, 1));
    }
}

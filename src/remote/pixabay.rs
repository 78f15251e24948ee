//! Pixabay image search client
//!
//! Uses Pixabay's official JSON API: one GET per search carrying the API
//! key, the language and the query.

use super::error::{FetchError, RemoteFetchError};
use super::traits::*;
use crate::config::PixabaySettings;
use crate::network::HttpClient;
use crate::results::{ImageResult, PixabayResponse};
use async_trait::async_trait;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Longest error body kept in a `Status` error
const MAX_ERROR_BODY: usize = 200;

/// Pixabay remote client
pub struct Pixabay {
    client: HttpClient,
    api_url: String,
    key: String,
    lang: String,
}

impl Pixabay {
    pub fn new(client: HttpClient, settings: &PixabaySettings) -> Self {
        Self {
            client,
            api_url: settings.base_url.clone(),
            key: settings.api_key.clone(),
            lang: settings.lang.clone(),
        }
    }

    /// Build the HTTP request for a search
    pub fn request(&self, query: &str) -> ApiRequest {
        ApiRequest::get(&self.api_url)
            .param("key", &self.key)
            .param("lang", &self.lang)
            .param("q", query)
    }

    /// Parse the HTTP response into images
    pub fn response(&self, response: ApiResponse) -> Result<Vec<ImageResult>, RemoteFetchError> {
        if !response.is_success() {
            if response.is_rate_limited() {
                warn!("Pixabay rate limit exceeded");
            } else {
                warn!("Pixabay returned HTTP {} for {}", response.status, response.url);
            }
            let body: String = response.text.chars().take(MAX_ERROR_BODY).collect();
            return Err(RemoteFetchError::Status {
                status: response.status,
                body,
            });
        }

        let envelope: PixabayResponse = response.json()?;
        debug!(
            "Pixabay returned {} of {} hits",
            envelope.hits.len(),
            envelope.total_hits
        );
        Ok(envelope.hits)
    }
}

#[async_trait]
impl RemoteClient for Pixabay {
    fn name(&self) -> &str {
        "pixabay"
    }

    async fn fetch(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ImageResult>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let start = Instant::now();
        let request = self.request(query);

        // Dropping the request future aborts the connection.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Pixabay request for '{}' cancelled", query);
                return Err(FetchError::Cancelled);
            }
            response = self.client.execute(request) => response?,
        };

        let images = self.response(response)?;
        debug!(
            "Pixabay search '{}' settled in {:?}",
            query,
            start.elapsed()
        );
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hit(id: u64, tags: &str) -> serde_json::Value {
        json!({
            "id": id,
            "pageURL": format!("https://pixabay.com/photos/{}/", id),
            "type": "photo",
            "tags": tags,
            "previewURL": format!("https://cdn.pixabay.com/{}_150.jpg", id),
            "previewWidth": 150,
            "previewHeight": 99,
            "user_id": 42,
            "user": "photographer"
        })
    }

    fn client_for(server: &MockServer) -> Pixabay {
        let settings = PixabaySettings {
            api_key: "test-key".to_string(),
            lang: "en".to_string(),
            base_url: format!("{}/api/", server.uri()),
        };
        Pixabay::new(HttpClient::new().unwrap(), &settings)
    }

    #[test]
    fn test_pixabay_request() {
        let settings = PixabaySettings {
            api_key: "abc".to_string(),
            ..Default::default()
        };
        let pixabay = Pixabay::new(HttpClient::new().unwrap(), &settings);
        let request = pixabay.request("yellow flowers");

        assert!(request.url.contains("pixabay.com/api"));
        assert_eq!(request.param_value("key"), Some("abc"));
        assert_eq!(request.param_value("lang"), Some("en"));
        assert_eq!(request.param_value("q"), Some("yellow flowers"));
        assert!(!format!("{:?}", request).contains("abc"));
    }

    #[tokio::test]
    async fn test_fetch_returns_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/"))
            .and(query_param("key", "test-key"))
            .and(query_param("lang", "en"))
            .and(query_param("q", "cats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "totalHits": 2,
                "hits": [hit(101, "cat, kitten"), hit(102, "cat, pet")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let images = client_for(&server)
            .fetch("cats", &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<String> = images.iter().map(|i| i.result_id()).collect();
        assert_eq!(ids, vec!["101", "102"]);
        assert_eq!(images[0].tags, "cat, kitten");
    }

    #[tokio::test]
    async fn test_fetch_empty_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 0,
                "totalHits": 0,
                "hits": []
            })))
            .mount(&server)
            .await;

        let images = client_for(&server)
            .fetch("nothing", &CancellationToken::new())
            .await
            .unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"hits\": [oops"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch("cats", &CancellationToken::new())
            .await;
        assert!(matches!(
            result,
            Err(FetchError::Remote(RemoteFetchError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("[ERROR 400] Invalid or missing API key"),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch("cats", &CancellationToken::new())
            .await;
        match result {
            Err(FetchError::Remote(RemoteFetchError::Status { status, body })) => {
                assert_eq!(status, 400);
                assert!(body.contains("API key"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_cancelled_mid_flight() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"total": 1, "totalHits": 1, "hits": [hit(1, "x")]}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let pixabay = client_for(&server);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let result = pixabay.fetch("slow", &token).await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fetch_with_cancelled_token_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        token.cancel();

        let result = client_for(&server).fetch("cats", &token).await;
        assert!(result.unwrap_err().is_cancelled());
    }
}

//! HTTP client for requests to the image search API

use crate::config::OutgoingSettings;
use crate::remote::{ApiRequest, ApiResponse, RemoteFetchError};
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with provider-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(settings.request_timeout)?;
        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: settings.user_agent.clone(),
        })
    }

    /// Execute a request
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RemoteFetchError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: ApiRequest,
        timeout: Duration,
    ) -> Result<ApiResponse, RemoteFetchError> {
        let url = reqwest::Url::parse_with_params(&request.url, &request.params)
            .map_err(|e| RemoteFetchError::InvalidRequest(e.to_string()))?;

        debug!("GET {} ({} params)", request.url, request.params.len());

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Read status and body; the body must be valid UTF-8
    async fn parse_response(response: Response) -> Result<ApiResponse, RemoteFetchError> {
        let status = response.status().as_u16();
        let url = response.url().path().to_string();

        let bytes = response.bytes().await?;
        let text = String::from_utf8(bytes.to_vec())?;

        Ok(ApiResponse { status, text, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unbounded_timeout_is_an_error() {
        let settings = OutgoingSettings {
            request_timeout: f64::INFINITY,
            ..Default::default()
        };
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_execute_encodes_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/"))
            .and(query_param("q", "red cars & bikes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = ApiRequest::get(format!("{}/api/", server.uri())).param("q", "red cars & bikes");
        let response = client.execute(request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.text, "ok");
    }

    #[tokio::test]
    async fn test_invalid_utf8_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let result = client.execute(ApiRequest::get(server.uri())).await;

        assert!(matches!(result, Err(RemoteFetchError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let result = client
            .execute_with_timeout(ApiRequest::get(server.uri()), Duration::from_millis(50))
            .await;

        assert!(matches!(result, Err(RemoteFetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = HttpClient::new().unwrap();
        let result = client.execute(ApiRequest::get("not a url")).await;
        assert!(matches!(result, Err(RemoteFetchError::InvalidRequest(_))));
    }
}

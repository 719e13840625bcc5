//! Shared HTTP client for courier APIs

use crate::config::CourierEndpoint;
use crate::core::{CourierError, ShopError, ShopResult};
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Longest upstream body kept in an error
const MAX_ERROR_BODY: usize = 512;

/// Thin wrapper around one pooled `reqwest::Client`.
///
/// Every request carries the account's `Api-Key` and `Secret-Key` headers
/// and is bounded by the configured timeout. There are no retries.
#[derive(Clone, Debug)]
pub struct CourierClient {
    http: reqwest::Client,
}

impl CourierClient {
    pub fn new(timeout: Duration) -> ShopResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShopError::Internal(format!("failed to build courier client: {}", e)))?;
        Ok(Self { http })
    }

    /// POST a JSON body to `path` under the endpoint's base URL
    pub async fn post_json(
        &self,
        endpoint: &CourierEndpoint,
        path: &str,
        body: &Value,
    ) -> Result<Value, CourierError> {
        let url = endpoint.url(path);
        debug!(provider = %endpoint.provider, %url, "courier POST");
        self.send(endpoint, self.http.post(&url).json(body)).await
    }

    /// GET `path` under the endpoint's base URL
    pub async fn get_json(&self, endpoint: &CourierEndpoint, path: &str) -> Result<Value, CourierError> {
        let url = endpoint.url(path);
        debug!(provider = %endpoint.provider, %url, "courier GET");
        self.send(endpoint, self.http.get(&url)).await
    }

    async fn send(&self, endpoint: &CourierEndpoint, request: RequestBuilder) -> Result<Value, CourierError> {
        let provider = endpoint.provider.clone();

        let response = request
            .header("Api-Key", &endpoint.api_key)
            .header("Secret-Key", &endpoint.secret_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CourierError::Transport {
                provider: provider.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CourierError::Transport {
            provider: provider.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(CourierError::UpstreamStatus {
                provider,
                status: status.as_u16(),
                body: truncate(text),
            });
        }

        serde_json::from_str(&text).map_err(|e| CourierError::MalformedResponse {
            provider,
            message: e.to_string(),
        })
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_ERROR_BODY);
        let cut = truncate(long);
        assert!(cut.len() <= MAX_ERROR_BODY);
        assert!(cut.chars().all(|c| c == 'é'));

        assert_eq!(truncate("short".to_string()), "short");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = CourierClient::new(Duration::from_secs(2)).unwrap();
        let endpoint = CourierEndpoint {
            provider: "steadfast".into(),
            // Port 9 on localhost is discard; nothing listens there in CI
            base_url: "http://127.0.0.1:9".into(),
            api_key: "k".into(),
            secret_key: "s".into(),
        };

        let err = client.get_json(&endpoint, "status_by_trackingcode/X").await.unwrap_err();
        assert!(matches!(err, CourierError::Transport { .. }));
    }
}

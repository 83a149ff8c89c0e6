use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{GenerateRequest, GenerateResponse};
use crate::config::{ProviderConfig, RequestConfig};
use crate::error::{CompletionError, CompletionResult};

/// Client for the provider's content-generation endpoint.
///
/// Every call is a single attempt: failures are returned to the caller as-is.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    request_config: RequestConfig,
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(config: &ProviderConfig, request_config: RequestConfig) -> CompletionResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = request_config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(CompletionError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.credential().map(str::to_string),
            request_config,
        })
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a completion for `prompt` and return the first candidate's text.
    ///
    /// Fails before any network activity when no credential is configured.
    pub async fn generate(&self, prompt: &str, temperature: f64) -> CompletionResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest::new(prompt, temperature);

        debug!(
            model = %self.model,
            temperature,
            prompt_chars = prompt.chars().count(),
            "Calling completion endpoint"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %redacted(&e), "Completion request failed");
                match self.request_config.timeout_ms {
                    Some(timeout_ms) if e.is_timeout() => CompletionError::Timeout { timeout_ms },
                    _ => CompletionError::Http(e.without_url()),
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                model = %self.model,
                status = status.as_u16(),
                latency_ms = start.elapsed().as_millis(),
                "Completion endpoint returned an error status"
            );
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::InvalidResponse {
                message: format!("Failed to read response body: {}", redacted(&e)),
            })?;

        let text = GenerateResponse::text_from_body(&body);
        if text.is_empty() {
            warn!(model = %self.model, "Completion response had no candidate text");
        }

        info!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis(),
            completion_chars = text.chars().count(),
            "Completion call succeeded"
        );

        Ok(text)
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Render a reqwest error without the request URL, which carries the credential.
fn redacted(e: &reqwest::Error) -> String {
    match e.url() {
        Some(url) => e.to_string().replace(url.as_str(), "<redacted>"),
        None => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ProviderConfig::new(Some("test_key".to_string()));
        let client = CompletionClient::new(&config, RequestConfig::default());
        assert!(client.is_ok());
        assert!(client.unwrap().has_credential());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ProviderConfig::new(None).with_base_url("http://localhost:8080/");
        let client = CompletionClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(!client.has_credential());
    }

    #[tokio::test]
    async fn test_generate_without_credential_fails_fast() {
        // Unroutable address: the call must fail before touching the network.
        let config = ProviderConfig::new(Some("  ".to_string())).with_base_url("http://192.0.2.1");
        let client = CompletionClient::new(&config, RequestConfig::default()).unwrap();

        let result = client.generate("prompt", 0.6).await;
        assert!(matches!(result, Err(CompletionError::MissingCredential)));
    }
}

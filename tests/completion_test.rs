//! Integration tests for the completion client
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use idea_crucible::completion::CompletionClient;
use idea_crucible::config::{ProviderConfig, RequestConfig};
use idea_crucible::error::CompletionError;

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Create a test client pointing to mock server
fn create_test_client(base_url: &str) -> CompletionClient {
    let config = ProviderConfig::new(Some("test-api-key".to_string())).with_base_url(base_url);
    CompletionClient::new(&config, RequestConfig::default()).expect("Failed to create client")
}

fn candidate_body(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|p| json!({ "text": p })).collect();
    json!({
        "candidates": [{ "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }]
    })
}

#[cfg(test)]
mod generate_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_generate() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Critique this" }] }],
                "generationConfig": { "temperature": 0.9 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(&[
                "{\"assumptions\":",
                "[\"a\"]}",
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.generate("Critique this", 0.9).await;

        assert!(result.is_ok(), "Generate should succeed: {:?}", result.err());
        assert_eq!(result.unwrap(), "{\"assumptions\":[\"a\"]}");
    }

    #[tokio::test]
    async fn test_unexpected_shape_yields_empty_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "promptFeedback": {} })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        assert_eq!(client.generate("x", 0.6).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_non_json_body_yields_empty_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        assert_eq!(client.generate("x", 0.6).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("API key not valid. Please pass a valid API key."),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let err = client.generate("x", 0.6).await.unwrap_err();

        match err {
            CompletionError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.generate("x", 0.6).await;

        assert!(matches!(result, Err(CompletionError::Api { status: 503, .. })));
        // MockServer verifies `.expect(1)` on drop
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(&["x"])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = ProviderConfig::new(None).with_base_url(mock_server.uri());
        let client = CompletionClient::new(&config, RequestConfig::default()).unwrap();

        let result = client.generate("x", 0.6).await;
        assert!(matches!(result, Err(CompletionError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop a listener so the port is closed.
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let client = create_test_client(&uri);
        let err = client.generate("x", 0.6).await.unwrap_err();

        assert!(matches!(err, CompletionError::Http(_)));
        assert!(!err.to_string().contains("test-api-key"));
    }

    #[tokio::test]
    async fn test_configured_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(&["late"]))
                    .set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = ProviderConfig::new(Some("k".to_string())).with_base_url(mock_server.uri());
        let client = CompletionClient::new(&config, RequestConfig { timeout_ms: Some(50) }).unwrap();

        let result = client.generate("x", 0.6).await;
        assert!(matches!(result, Err(CompletionError::Timeout { timeout_ms: 50 })));
    }
}

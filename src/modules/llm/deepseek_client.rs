use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionClient, GatewayError};
use crate::core::config::LlmConfig;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the DeepSeek (OpenAI-compatible) chat completions endpoint
pub struct DeepSeekClient {
    config: LlmConfig,
    http_client: reqwest::Client,
}

impl DeepSeekClient {
    pub fn new(config: LlmConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_send_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for DeepSeekClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            "Sending {} messages to LLM model {}",
            messages.len(),
            self.config.model
        );

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("LLM request failed: {}", e);
                Self::map_send_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LLM API error: HTTP {} - {}", status, body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read LLM response body: {}", e);
            Self::map_send_error(e)
        })?;

        // A 2xx body outside the completion shape carries no usable text
        let completion: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unexpected LLM response shape: {}", e);
            GatewayError::EmptyContent
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GatewayError::EmptyContent)?;

        tracing::debug!("LLM replied with {} chars", content.chars().count());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    /// Serve `router` on an ephemeral port and return its completions URL
    async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn config(api_url: String, timeout: Duration) -> LlmConfig {
        LlmConfig {
            api_url,
            api_key: "test-key".to_string(),
            model: "deepseek-chat".to_string(),
            timeout,
            temperature: 0.7,
            max_tokens: 8000,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_and_sends_payload() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["model"], "deepseek-chat");
                assert_eq!(body["max_tokens"], 8000);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "halo");
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"text\":\"hai\"}"}}]
                }))
            }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_secs(5))).unwrap();

        let reply = client
            .complete(&[ChatMessage::system("rules"), ChatMessage::user("halo")])
            .await
            .unwrap();

        assert_eq!(reply, "{\"text\":\"hai\"}");
    }

    #[tokio::test]
    async fn test_complete_maps_error_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_secs(5))).unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_secs(5))).unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyContent));
    }

    #[tokio::test]
    async fn test_complete_rejects_choice_without_message() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": [{"finish_reason": "stop"}]})) }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_secs(5))).unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyContent));
    }

    #[tokio::test]
    async fn test_complete_rejects_non_json_body() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { "<html>gateway ok</html>" }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_secs(5))).unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyContent));
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"choices": []}))
            }),
        );
        let url = spawn_provider(router).await;
        let client = DeepSeekClient::new(config(url, Duration::from_millis(100))).unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_connection_error() {
        let client = DeepSeekClient::new(config(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            Duration::from_secs(2),
        ))
        .unwrap();

        let err = client.complete(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)));
    }
}

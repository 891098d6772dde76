use async_trait::async_trait;
use futures::{future, StreamExt};
use reqwest::Client;

use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::upstream_event::UpstreamEvent;
use crate::errors::{RelayError, RelayResult};
use crate::helpers::prompt_generator::generate_edit_messages;
use crate::structs::ai::openai::openai_request::OpenAIRequest;
use crate::structs::ai::openai::openai_response_format::OpenAIResponseFormat;
use crate::structs::config::ai_config::AiConfig;
use crate::structs::edit_request::EditRequest;
use crate::traits::upstream_provider::{UpstreamProvider, UpstreamStream};

/// Chat-completions streaming client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        let defaults = AiConfig::default();
        Self {
            api_key,
            base_url: defaults.base_url,
            client: Client::new(),
            model: defaults.model,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    pub fn from_config(config: &AiConfig) -> RelayResult<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            RelayError::service_disabled(&format!("environment variable {} is not set", config.api_key_env))
        })?;

        Ok(Self::new(api_key)
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_sampling(config.max_tokens, config.temperature))
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn get_request(&self, request: &EditRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: generate_edit_messages(request),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            stream: true,
            response_format: Some(OpenAIResponseFormat::json_object()),
            user: request.thread_id.clone(),
        }
    }

    async fn make_request(&self, url: String, request_body: &OpenAIRequest) -> Result<reqwest::Response, AiProviderError> {
        log::debug!("📦 Request model: {}", request_body.model);

        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request_body)
            .send()
            .await
            .map_err(|e| AiProviderError::NetworkError(e.to_string()))
    }

    /// Events carried by one SSE line of the provider stream.
    pub fn parse_sse_line(line: &str) -> Vec<Result<UpstreamEvent, AiProviderError>> {
        let line = line.trim_end_matches('\r');
        let Some(data) = line.strip_prefix("data:") else {
            return Vec::new();
        };
        let data = data.trim();

        if data.is_empty() {
            return Vec::new();
        }
        if data == "[DONE]" {
            return vec![Ok(UpstreamEvent::MessageDone)];
        }

        let json = match serde_json::from_str::<serde_json::Value>(data) {
            Ok(json) => json,
            Err(e) => {
                return vec![Err(AiProviderError::SerializationError(format!(
                    "Failed to parse OpenAI event: {}",
                    e
                )))]
            }
        };

        // Handle error response inside stream
        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string);
            return vec![Ok(UpstreamEvent::RunFailed { message })];
        }

        let mut events = Vec::new();
        let Some(choice) = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
        else {
            return events;
        };

        if let Some(content) = choice
            .get("delta")
            .and_then(|delta| delta.get("content"))
            .and_then(|c| c.as_str())
        {
            if !content.is_empty() {
                events.push(Ok(UpstreamEvent::TextDelta(content.to_string())));
            }
        }

        if let Some(finish_reason) = choice.get("finish_reason").and_then(|f| f.as_str()) {
            events.push(Ok(match finish_reason {
                "length" => UpstreamEvent::RunFailed {
                    message: Some("The response reached the maximum output length".to_string()),
                },
                "content_filter" => UpstreamEvent::RunFailed {
                    message: Some("The response was stopped by the content filter".to_string()),
                },
                _ => UpstreamEvent::MessageDone,
            }));
        }

        events
    }

    /// Split a byte stream into lines without breaking multi-byte characters.
    fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
            lines.push(String::from_utf8_lossy(&line[..newline_pos]).into_owned());
        }
        lines
    }
}

#[async_trait]
impl UpstreamProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn open_stream(&self, request: &EditRequest) -> Result<UpstreamStream, AiProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = self.get_request(request);

        let response = self.make_request(url, &request_body).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            log::error!("❌ OpenAI API Error Response: {}", error_text);

            return Err(match status.as_u16() {
                401 | 403 => AiProviderError::AuthenticationError(error_text),
                429 => AiProviderError::ApiError(format!("Rate limit exceeded: {}", error_text)),
                _ => AiProviderError::ApiError(format!("HTTP {}: {}", status, error_text)),
            });
        }

        // Convert byte stream into newline-delimited SSE events
        let stream = response
            .bytes_stream()
            .scan(Vec::new(), |buffer, chunk_result| {
                future::ready(match chunk_result {
                    Ok(bytes) => {
                        buffer.extend_from_slice(&bytes);
                        let items: Vec<_> = Self::drain_lines(buffer)
                            .iter()
                            .flat_map(|line| Self::parse_sse_line(line))
                            .collect();
                        Some(futures::stream::iter(items))
                    }
                    Err(e) => {
                        let error = AiProviderError::NetworkError(format!("Stream error: {}", e));
                        Some(futures::stream::iter(vec![Err(error)]))
                    }
                })
            })
            .flatten();

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(line: &str) -> Vec<UpstreamEvent> {
        OpenAIProvider::parse_sse_line(line)
            .into_iter()
            .map(|event| event.expect("event should parse"))
            .collect()
    }

    #[test]
    fn parses_content_deltas() {
        assert_eq!(
            events(r#"data: {"choices":[{"delta":{"content":"{\"con"},"finish_reason":null}]}"#),
            vec![UpstreamEvent::TextDelta("{\"con".into())]
        );
    }

    #[test]
    fn maps_finish_reasons() {
        assert_eq!(
            events(r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#),
            vec![UpstreamEvent::MessageDone]
        );
        assert!(matches!(
            events(r#"data: {"choices":[{"delta":{},"finish_reason":"length"}]}"#).as_slice(),
            [UpstreamEvent::RunFailed { message: Some(_) }]
        ));
        assert_eq!(events("data: [DONE]"), vec![UpstreamEvent::MessageDone]);
    }

    #[test]
    fn maps_in_stream_errors_to_run_failures() {
        assert_eq!(
            events(r#"data: {"error":{"message":"Rate limit reached","type":"requests"}}"#),
            vec![UpstreamEvent::RunFailed { message: Some("Rate limit reached".into()) }]
        );
    }

    #[test]
    fn ignores_non_data_lines() {
        assert!(events(": ping").is_empty());
        assert!(events("event: message").is_empty());
        assert!(events("").is_empty());
    }

    #[test]
    fn reports_unparseable_payloads() {
        let parsed = OpenAIProvider::parse_sse_line("data: {not json");
        assert!(matches!(parsed.as_slice(), [Err(AiProviderError::SerializationError(_))]));
    }

    #[test]
    fn keeps_split_multibyte_characters_intact() {
        let mut buffer = "data: 世".as_bytes()[..8].to_vec();
        assert!(OpenAIProvider::drain_lines(&mut buffer).is_empty());

        buffer.extend_from_slice(&"data: 世\n".as_bytes()[8..]);
        assert_eq!(OpenAIProvider::drain_lines(&mut buffer), vec!["data: 世".to_string()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn forwards_thread_id_and_json_format() {
        let provider = OpenAIProvider::new("key".into()).with_model("gpt-test".into());
        let body = provider.get_request(&EditRequest::new("u", "m", Some("thread_9")));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-test");
        assert_eq!(json["stream"], true);
        assert_eq!(json["user"], "thread_9");
        assert_eq!(json["response_format"]["type"], "json_object");
    }
}

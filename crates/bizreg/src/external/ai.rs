use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Placeholder returned when no API key is configured.
pub const MISSING_API_KEY: &str = "Missing API key.";
/// Placeholder returned when the request or decode fails.
pub const GENERATION_ERROR: &str = "Error generating response.";
/// Placeholder returned when the provider answers with no content.
pub const EMPTY_RESPONSE: &str = "No response.";

/// Chat-completion client. Never fails the caller: every error path
/// resolves to one of the documented placeholder strings.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("bizreg-api")
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a completion result is one of the degraded placeholders.
    pub fn is_degraded(response: &str) -> bool {
        let trimmed = response.trim();
        trimmed.is_empty()
            || trimmed == MISSING_API_KEY
            || trimmed == GENERATION_ERROR
            || trimmed == EMPTY_RESPONSE
    }

    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return MISSING_API_KEY.to_string();
        };

        match self.request(api_key, prompt, max_tokens).await {
            Ok(content) if content.is_empty() => EMPTY_RESPONSE.to_string(),
            Ok(content) => content,
            Err(error) => {
                warn!(%error, "completion request failed");
                GENERATION_ERROR.to_string()
            }
        }
    }

    async fn request(
        &self,
        api_key: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, reqwest::Error> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_tokens,
            "temperature": 0.8,
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload = response.json::<ChatCompletionResponse>().await?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_short_circuits_without_a_request() {
        // No server is listening at the base URL; a request would error out
        // with a different sentinel.
        let client = CompletionClient::new(None).with_base_url("http://127.0.0.1:9");
        assert_eq!(client.complete("hello", 10).await, MISSING_API_KEY);
    }

    #[test]
    fn degraded_detection_covers_the_placeholders() {
        for degraded in [MISSING_API_KEY, GENERATION_ERROR, EMPTY_RESPONSE, "", "  "] {
            assert!(CompletionClient::is_degraded(degraded), "{degraded:?}");
        }
        assert!(!CompletionClient::is_degraded("Good Morning!"));
    }
}

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::{ApiKey, CompletionError, FailureKind};

#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for CompletionSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            max_bytes: settings.max_response_bytes,
        }
    }
}

/// One single-message request to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
}

#[async_trait::async_trait]
pub trait Completer: Send + Sync {
    /// Returns the content of the first choice.
    async fn complete(
        &self,
        api_key: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat-completions client for OpenAI-compatible services.
#[derive(Debug, Clone)]
pub struct OpenAiCompleter {
    settings: CompletionSettings,
}

impl OpenAiCompleter {
    pub fn new(settings: CompletionSettings) -> Self {
        Self { settings }
    }

    fn endpoint(&self) -> Result<reqwest::Url, CompletionError> {
        let base = self.settings.base_url.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}/chat/completions"))
            .map_err(|err| CompletionError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self) -> Result<reqwest::Client, CompletionError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CompletionError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, CompletionError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(
        &self,
        api_key: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let url = self.endpoint()?;
        let client = self.build_client()?;

        let body = ChatRequest {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
        };
        let payload = serde_json::to_vec(&body)
            .map_err(|err| CompletionError::new(FailureKind::InvalidRequest, err.to_string()))?;

        let response = client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;

        if !status.is_success() {
            return Err(CompletionError::new(
                map_status(status),
                error_message(status, &bytes),
            ));
        }

        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|err| CompletionError::new(FailureKind::MalformedResponse, err.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::new(FailureKind::NoChoices, "choices array is empty"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

fn map_status(status: StatusCode) -> FailureKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FailureKind::Authentication(status.as_u16())
        }
        StatusCode::TOO_MANY_REQUESTS => FailureKind::RateLimited,
        other => FailureKind::HttpStatus(other.as_u16()),
    }
}

/// Prefer the service's own `error.message`, fall back to the status line.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| status.to_string())
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> CompletionError {
    CompletionError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        return CompletionError::new(FailureKind::Timeout, err.to_string());
    }
    CompletionError::new(FailureKind::Network, err.to_string())
}

//! Messaging gateway backed by the Telegram Bot API.

use crate::services::http_client::{HttpClient, HttpClientError, OperationType};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

/// Outbound chat operations
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), MessagingError>;

    async fn send_voice(&self, chat_id: i64, audio: Vec<u8>) -> Result<(), MessagingError>;

    /// Download a file previously uploaded by a user
    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, MessagingError>;
}

/// Errors returned by a messaging gateway
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Telegram request failed: {0}")]
    Transport(#[from] HttpClientError),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Failed to parse Telegram response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Envelope every Bot API method responds with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

/// Telegram Bot API client
pub struct TelegramClient {
    http: HttpClient,
    token: String,
    base_url: String,
}

impl TelegramClient {
    pub fn new(http: HttpClient, token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn read_envelope<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<Option<T>, MessagingError> {
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.without_url().to_string()))?;

        if envelope.ok {
            Ok(envelope.result)
        } else {
            Err(MessagingError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[async_trait]
impl MessagingGateway for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), MessagingError> {
        let request = self
            .http
            .post(&self.method_url("sendMessage"))
            .json(&SendMessageRequest { chat_id, text });

        let response = self.http.send(request, OperationType::Write).await?;
        Self::read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn send_voice(&self, chat_id: i64, audio: Vec<u8>) -> Result<(), MessagingError> {
        let voice = Part::bytes(audio)
            .file_name("reply.ogg")
            .mime_str("audio/ogg")
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("voice", voice);

        let request = self
            .http
            .post(&self.method_url("sendVoice"))
            .multipart(form);

        let response = self.http.send(request, OperationType::Write).await?;
        Self::read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, MessagingError> {
        let request = self
            .http
            .post(&self.method_url("getFile"))
            .query(&[("file_id", file_id)]);

        let response = self.http.send(request, OperationType::Read).await?;
        let file_path = Self::read_envelope::<FileInfo>(response)
            .await?
            .and_then(|info| info.file_path)
            .ok_or_else(|| MessagingError::InvalidResponse("file_path missing".to_string()))?;

        let download = self
            .http
            .send(self.http.get(&self.file_url(&file_path)), OperationType::Read)
            .await?;

        if !download.status().is_success() {
            return Err(MessagingError::Api(format!(
                "file download returned status {}",
                download.status()
            )));
        }

        let bytes = download
            .bytes()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.without_url().to_string()))?;

        Ok(bytes.to_vec())
    }
}

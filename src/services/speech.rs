//! Speech gateway backed by Yandex SpeechKit (v1 REST API).
//!
//! Recognition and synthesis both authenticate with a bearer IAM token that
//! is obtained outside this service and supplied through configuration.

use crate::services::http_client::{HttpClient, HttpClientError, OperationType};
use async_trait::async_trait;
use serde::Deserialize;

/// Speech-to-text and text-to-speech operations
#[async_trait]
pub trait SpeechGateway: Send + Sync {
    /// Recognise Russian speech in an OggOpus clip
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError>;

    /// Synthesise OggOpus audio for `text`
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Errors returned by a speech gateway
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech was not recognized")]
    Unrecognized,

    #[error("Speech request failed: {0}")]
    Transport(#[from] HttpClientError),

    #[error("Speech service returned status: {0}")]
    Status(u16),

    #[error("Invalid speech service response: {0}")]
    InvalidResponse(String),
}

/// Static SpeechKit settings
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub stt_url: String,
    pub tts_url: String,
    pub iam_token: String,
    pub folder_id: Option<String>,
    pub language: String,
    pub voice: String,
    pub format: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            stt_url: "https://stt.api.cloud.yandex.net/speech/v1/stt:recognize".to_string(),
            tts_url: "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize".to_string(),
            iam_token: String::new(),
            folder_id: None,
            language: "ru-RU".to_string(),
            voice: "oksana".to_string(),
            format: "oggopus".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    result: Option<String>,
}

/// SpeechKit client
pub struct YandexSpeechClient {
    http: HttpClient,
    settings: SpeechSettings,
}

impl YandexSpeechClient {
    pub fn new(http: HttpClient, settings: SpeechSettings) -> Self {
        Self { http, settings }
    }

    fn recognize_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lang", self.settings.language.clone()),
            ("format", self.settings.format.clone()),
        ];
        if let Some(folder_id) = &self.settings.folder_id {
            params.push(("folderId", folder_id.clone()));
        }
        params
    }

    fn synthesize_form<'a>(&'a self, text: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("text", text),
            ("lang", self.settings.language.as_str()),
            ("voice", self.settings.voice.as_str()),
            ("format", self.settings.format.as_str()),
        ];
        if let Some(folder_id) = &self.settings.folder_id {
            form.push(("folderId", folder_id.as_str()));
        }
        form
    }
}

#[async_trait]
impl SpeechGateway for YandexSpeechClient {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError> {
        let request = self
            .http
            .post(&self.settings.stt_url)
            .bearer_auth(&self.settings.iam_token)
            .query(&self.recognize_params())
            .body(audio);

        let response = self.http.send(request, OperationType::Write).await?;
        if !response.status().is_success() {
            return Err(SpeechError::Status(response.status().as_u16()));
        }

        let recognition: RecognitionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.without_url().to_string()))?;

        match recognition.result {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(SpeechError::Unrecognized),
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let request = self
            .http
            .post(&self.settings.tts_url)
            .bearer_auth(&self.settings.iam_token)
            .form(&self.synthesize_form(text));

        let response = self.http.send(request, OperationType::Write).await?;
        if !response.status().is_success() {
            return Err(SpeechError::Status(response.status().as_u16()));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.without_url().to_string()))?;

        Ok(audio.to_vec())
    }
}

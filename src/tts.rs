use crate::error::SynthesisFailure;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";

/// Voice, model and audio container requested from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisProfile {
    pub model: String,
    pub voice: String,
    /// Audio container, also used as the artifact extension.
    pub format: String,
}

impl Default for SynthesisProfile {
    fn default() -> Self {
        Self {
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
        }
    }
}

/// JSON request body with `{{text}}`, `{{model}}`, `{{voice}}` and
/// `{{format}}` placeholders in its string values.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTemplate(Value);

impl Default for RequestTemplate {
    fn default() -> Self {
        Self(serde_json::json!({
            "model": "{{model}}",
            "voice": "{{voice}}",
            "input": "{{text}}",
            "response_format": "{{format}}",
        }))
    }
}

impl RequestTemplate {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self)
    }

    /// Substitute every placeholder in the template.
    pub fn render(&self, text: &str, profile: &SynthesisProfile) -> Value {
        fill(&self.0, text, profile)
    }
}

fn fill(value: &Value, text: &str, profile: &SynthesisProfile) -> Value {
    match value {
        Value::String(s) => Value::String(
            s.replace("{{model}}", &profile.model)
                .replace("{{voice}}", &profile.voice)
                .replace("{{format}}", &profile.format)
                .replace("{{text}}", text),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| fill(v, text, profile)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), fill(v, text, profile)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A remote text-to-speech backend returning raw audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisFailure>;
}

/// HTTP client with bearer authentication and a configurable JSON body.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    profile: SynthesisProfile,
    template: RequestTemplate,
}

impl HttpSynthesizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        profile: SynthesisProfile,
        template: RequestTemplate,
        timeout: Option<Duration>,
    ) -> Result<Self, SynthesisFailure> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            profile,
            template,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisFailure> {
        let body = self.template.render(text, &self.profile);
        debug!(
            endpoint = %self.endpoint,
            model = %self.profile.model,
            voice = %self.profile.voice,
            text_length = text.len(),
            "Calling TTS service"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "TTS service rejected request");
            return Err(SynthesisFailure::from_status(status.as_u16(), body));
        }

        let audio = response.bytes().await?.to_vec();
        debug!(audio_size = audio.len(), "TTS audio received");
        Ok(audio)
    }
}

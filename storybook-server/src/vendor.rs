//! Upstream voice provider client

use crate::config::ServerConfig;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use storybook_core::VoiceDescriptor;
use thiserror::Error;
use tracing::debug;

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Why an upstream call failed. The handlers map `Upstream` and
/// `Transport` to the same 502; keeping them apart preserves the
/// provider status for the error body.
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Upstream returned {status}: {details}")]
    Upstream { status: u16, details: String },

    #[error("Request failed: {0}")]
    Transport(String),
}

/// The voice provider behind the proxy.
#[async_trait]
pub trait VoiceVendor: Send + Sync {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceDescriptor>, VendorError>;

    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
    ) -> Result<Bytes, VendorError>;
}

#[derive(Debug, Deserialize)]
struct UpstreamVoice {
    voice_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamVoiceList {
    #[serde(default)]
    voices: Vec<UpstreamVoice>,
}

/// ElevenLabs client.
pub struct ElevenLabsVendor {
    client: reqwest::Client,
    base_url: String,
    model_id: String,
}

impl ElevenLabsVendor {
    pub fn new(config: &ServerConfig) -> Result<Self, VendorError> {
        Self::with_base_url(config, ELEVENLABS_BASE_URL)
    }

    pub fn with_base_url(config: &ServerConfig, base_url: &str) -> Result<Self, VendorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VendorError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, VendorError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let details = response.text().await.unwrap_or_default();
        Err(VendorError::Upstream { status, details })
    }
}

#[async_trait]
impl VoiceVendor for ElevenLabsVendor {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceDescriptor>, VendorError> {
        let url = format!("{}/v1/voices", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("xi-api-key", api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| VendorError::Transport(format!("Voices request failed: {}", e)))?;
        let response = Self::check(response).await?;

        let list: UpstreamVoiceList = response
            .json()
            .await
            .map_err(|e| VendorError::Transport(format!("Failed to parse voices: {}", e)))?;

        debug!("Upstream returned {} voices", list.voices.len());
        Ok(list
            .voices
            .into_iter()
            .map(|v| VoiceDescriptor {
                voice_id: v.voice_id,
                name: v.name,
                category: v.category,
            })
            .collect())
    }

    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
    ) -> Result<Bytes, VendorError> {
        let url = format!(
            "{}/v1/text-to-speech/{}/stream?output_format=mp3_44100_128",
            self.base_url,
            urlencoding::encode(voice_id)
        );

        let body = json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": 0.45,
                "similarity_boost": 0.75,
                "style": 0.2,
                "use_speaker_boost": true
            }
        });

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| VendorError::Transport(format!("TTS request failed: {}", e)))?;
        let response = Self::check(response).await?;

        response
            .bytes()
            .await
            .map_err(|e| VendorError::Transport(format!("Failed to read audio: {}", e)))
    }
}

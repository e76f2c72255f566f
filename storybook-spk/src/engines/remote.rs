//! HTTP client for the narration proxy

use crate::config::NarratorConfig;
use crate::engines::RemoteSynthesizer;
use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use storybook_core::{TtsRequest, VoiceDescriptor, VoiceListResponse};
use tracing::debug;

/// Remote synthesis over the proxy's `/api/tts` and `/api/voices` routes.
pub struct HttpRemoteSynthesizer {
    client: Client,
    base_url: String,
}

impl HttpRemoteSynthesizer {
    pub fn new(config: &NarratorConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RemoteSynthesizer for HttpRemoteSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<Bytes, SpeechError> {
        let url = format!("{}/api/tts", self.base_url);
        let request = TtsRequest {
            text: text.to_string(),
            voice_id: voice_id.map(|v| v.to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Remote(format!("TTS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpeechError::Remote(format!(
                "TTS request failed ({}): {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Remote(format!("Failed to read audio response: {}", e)))?;

        debug!("Received {} bytes of synthesized audio", audio.len());
        Ok(audio)
    }

    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
        let url = format!("{}/api/voices", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SpeechError::Remote(format!("Voice list request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpeechError::Remote(format!(
                "Voice list request failed ({}): {}",
                status, error_text
            )));
        }

        let list: VoiceListResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Remote(format!("Failed to parse voice list: {}", e)))?;

        Ok(list.voices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let mut config = NarratorConfig::default();
        config.proxy_url = "http://localhost:5000/".to_string();
        let synth = HttpRemoteSynthesizer::new(&config).unwrap();
        assert_eq!(synth.base_url, "http://localhost:5000");
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = NarratorConfig::default();
        config.proxy_url = "not a url".to_string();
        assert!(matches!(
            HttpRemoteSynthesizer::new(&config),
            Err(SpeechError::Config(_))
        ));
    }
}

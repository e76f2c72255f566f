//! Server configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Proxy configuration, read from the environment at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// ElevenLabs API key; without it both routes answer 400.
    pub api_key: Option<String>,

    /// Voice used when a request names none.
    pub default_voice_id: Option<String>,

    /// ElevenLabs model id.
    pub model_id: String,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_voice_id: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("ELEVENLABS_API_KEY"),
            default_voice_id: non_empty_var("ELEVENLABS_VOICE_ID"),
            model_id: non_empty_var("ELEVENLABS_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            ..Self::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

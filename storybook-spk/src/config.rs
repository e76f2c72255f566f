//! Configuration for the narrator

use serde::{Deserialize, Serialize};

/// Narrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Base URL of the narration proxy
    pub proxy_url: String,

    /// Timeout for remote synthesis requests, in seconds
    pub timeout_secs: u64,

    /// Command used for the local fallback engine
    pub local_command: String,

    /// Speech rate for the local engine (words per minute)
    pub local_rate: u32,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
            local_command: "espeak-ng".to_string(),
            local_rate: 160,
        }
    }
}

impl NarratorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.proxy_url.is_empty() {
            return Err("Proxy URL cannot be empty".to_string());
        }

        if !self.proxy_url.starts_with("http://") && !self.proxy_url.starts_with("https://") {
            return Err("Proxy URL must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.proxy_url).is_err() {
            return Err(format!("Invalid proxy URL: {}", self.proxy_url));
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.timeout_secs > 300 {
            return Err("Timeout too large (max 300 seconds)".to_string());
        }

        if self.local_command.is_empty() {
            return Err("Local engine command cannot be empty".to_string());
        }

        if self.local_rate == 0 || self.local_rate > 500 {
            return Err("Local speech rate must be between 1 and 500 WPM".to_string());
        }

        Ok(())
    }
}

//! Wire types shared by the narration client and the proxy

use serde::{Deserialize, Serialize};

/// One remote-provider voice choice.
///
/// The set returned by the proxy forms the user-visible voice list,
/// unique by `voice_id`, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Body of `GET /api/voices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceDescriptor>,
}

/// Body of `POST /api/tts`.
///
/// `voice_id` rides as `voiceId` on the wire; absent means "use the
/// server-side default voice".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(
        rename = "voiceId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_id: Option<String>,
}

/// Structured error body returned by the proxy on 400/502/500.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Upstream HTTP status, when the failure came from the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

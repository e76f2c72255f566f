//! HTTP routes for the narration proxy

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use storybook_core::{ErrorBody, TtsRequest, VoiceListResponse};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::vendor::{VendorError, VoiceVendor};

// Matches the original client's payload cap.
const MAX_BODY_BYTES: usize = 200 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<ServerConfig>,
    pub vendor: Arc<dyn VoiceVendor>,
}

/// Assemble the proxy router: the two API routes, a permissive CORS
/// layer, and (when configured) the static UI assets as the fallback.
pub fn build_router(state: ApiState, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/api/voices", get(voices_handler))
        .route("/api/tts", post(tts_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state);

    if let Some(dir) = static_dir {
        info!("Serving static assets from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

async fn voices_handler(State(state): State<ApiState>) -> Response {
    let Some(api_key) = state.config.api_key.clone() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing ELEVENLABS_API_KEY",
            None,
            None,
        );
    };

    match state.vendor.list_voices(&api_key).await {
        Ok(voices) => (
            [(header::CACHE_CONTROL, "no-store")],
            Json(VoiceListResponse { voices }),
        )
            .into_response(),
        Err(e) => upstream_error("Voice list request failed", e),
    }
}

async fn tts_handler(State(state): State<ApiState>, Json(request): Json<TtsRequest>) -> Response {
    let Some(api_key) = state.config.api_key.clone() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing ELEVENLABS_API_KEY",
            None,
            None,
        );
    };

    let text = request.text.trim();
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing text", None, None);
    }

    let voice_id = request
        .voice_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(state.config.default_voice_id.as_deref());
    let Some(voice_id) = voice_id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing ELEVENLABS_VOICE_ID (or voiceId in request)",
            None,
            None,
        );
    };

    match state.vendor.synthesize(&api_key, voice_id, text).await {
        Ok(audio) => (
            [
                (header::CONTENT_TYPE, "audio/mpeg"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            audio,
        )
            .into_response(),
        Err(e) => upstream_error("ElevenLabs request failed", e),
    }
}

fn upstream_error(message: &str, error: VendorError) -> Response {
    warn!("{}: {}", message, error);
    match error {
        VendorError::Upstream { status, details } => error_response(
            StatusCode::BAD_GATEWAY,
            message,
            Some(status),
            Some(details),
        ),
        VendorError::Transport(details) => {
            error_response(StatusCode::BAD_GATEWAY, message, None, Some(details))
        }
    }
}

fn error_response(
    code: StatusCode,
    message: &str,
    status: Option<u16>,
    details: Option<String>,
) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
        status,
        details,
    };
    (code, Json(body)).into_response()
}

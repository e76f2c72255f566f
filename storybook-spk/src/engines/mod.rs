//! Synthesis backends

pub mod local;
pub mod remote;

use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use storybook_core::VoiceDescriptor;

/// Remote synthesis backend: one network round trip per utterance.
#[async_trait]
pub trait RemoteSynthesizer: Send + Sync {
    /// Synthesize text to encoded audio.
    ///
    /// Transport errors and non-success statuses surface identically;
    /// the caller treats every failure as "fall back to the local tier".
    async fn synthesize(&self, text: &str, voice_id: Option<&str>)
        -> Result<Bytes, SpeechError>;

    /// List the voices the remote provider offers.
    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError>;
}

/// Callbacks fired as a local utterance progresses. Exactly one of
/// `on_end`/`on_error` fires per utterance, after `on_start`.
pub struct UtteranceEvents {
    pub on_start: Box<dyn FnOnce() + Send>,
    pub on_end: Box<dyn FnOnce() + Send>,
    pub on_error: Box<dyn FnOnce(SpeechError) + Send>,
}

/// Control over one in-progress local utterance.
pub trait UtteranceControl: Send {
    /// Stop the utterance and release its resources. Idempotent; no
    /// events fire after a stop.
    fn stop(&mut self);
}

/// In-process fallback engine, best-effort and non-networked.
pub trait LocalSynthesis: Send + Sync {
    fn is_available(&self) -> bool;

    fn speak(
        &self,
        text: &str,
        events: UtteranceEvents,
    ) -> Result<Box<dyn UtteranceControl>, SpeechError>;
}

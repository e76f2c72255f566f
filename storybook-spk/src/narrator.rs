//! Narration orchestration
//!
//! The narrator decides what to read and how: it pulls text from the
//! content source, asks the remote backend to synthesize it, falls back
//! to the local engine when the request fails, and keeps at most one
//! utterance active. A newer narration request always wins over an
//! older one, even while the older one's network round trip is still in
//! flight.

use crate::config::NarratorConfig;
use crate::engines::local::EspeakEngine;
use crate::engines::remote::HttpRemoteSynthesizer;
use crate::engines::{LocalSynthesis, RemoteSynthesizer, UtteranceControl, UtteranceEvents};
use crate::error::SpeechError;
use crate::playback::{AudioPlayer, PlaybackEnd, PlaybackHandle, RodioPlayer};
use crate::voices::default_voice;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storybook_core::{ContentSource, VoiceDescriptor};
use tracing::{debug, info, warn};

/// Where the current utterance attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RequestingRemote,
    PlayingRemote,
    RequestingLocal,
    PlayingLocal,
}

enum ActiveHandle {
    Remote(Box<dyn PlaybackHandle>),
    Local(Box<dyn UtteranceControl>),
}

impl ActiveHandle {
    fn stop(&mut self) {
        match self {
            ActiveHandle::Remote(handle) => handle.stop(),
            ActiveHandle::Local(control) => control.stop(),
        }
    }
}

struct NarrationState {
    enabled: bool,
    phase: Phase,
    last_text: Option<String>,
    selected_voice: Option<String>,
    active: Option<ActiveHandle>,
}

impl NarrationState {
    fn new() -> Self {
        Self {
            enabled: false,
            phase: Phase::Idle,
            last_text: None,
            selected_voice: None,
            active: None,
        }
    }

    /// Release the active handle (if any) and return to idle.
    /// `last_text` survives so a re-enable can decide what to do.
    fn teardown(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.stop();
        }
        self.phase = Phase::Idle;
    }
}

/// Read-aloud narration controller.
///
/// Shared freely behind `Arc`; all state lives behind one lock and every
/// asynchronous completion re-checks the request generation before
/// touching it, so a stale remote response or a late playback callback
/// can never clobber a newer attempt.
pub struct Narrator {
    content: Arc<dyn ContentSource>,
    remote: Arc<dyn RemoteSynthesizer>,
    local: Arc<dyn LocalSynthesis>,
    player: Arc<dyn AudioPlayer>,
    state: Arc<Mutex<NarrationState>>,
    generation: Arc<AtomicU64>,
}

impl Narrator {
    pub fn new(
        content: Arc<dyn ContentSource>,
        remote: Arc<dyn RemoteSynthesizer>,
        local: Arc<dyn LocalSynthesis>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            content,
            remote,
            local,
            player,
            state: Arc::new(Mutex::new(NarrationState::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wire up the default backends: HTTP to the proxy, espeak-ng as the
    /// local tier, rodio for playback.
    pub fn with_config(
        config: &NarratorConfig,
        content: Arc<dyn ContentSource>,
    ) -> Result<Self, SpeechError> {
        let remote = HttpRemoteSynthesizer::new(config)?;
        let local = EspeakEngine::new(&config.local_command, config.local_rate);
        Ok(Self::new(
            content,
            Arc::new(remote),
            Arc::new(local),
            Arc::new(RodioPlayer::new()),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// True from the moment a narration attempt starts until it ends,
    /// errors out, or is preempted.
    pub fn is_speaking(&self) -> bool {
        self.state.lock().phase != Phase::Idle
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn selected_voice(&self) -> Option<String> {
        self.state.lock().selected_voice.clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.state.lock().last_text.clone()
    }

    /// Toggle narration. Enabling reads the current content right away;
    /// disabling stops whatever is playing but keeps `last_text`, so the
    /// choice of what a re-enable does stays with `narrate_current`.
    pub async fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
        if enabled {
            info!("Narration enabled");
            self.narrate(false).await;
        } else {
            info!("Narration disabled");
            self.stop_narration();
        }
    }

    /// Narrate whatever the content source currently shows.
    ///
    /// No-op when nothing is readable, or when the same text is already
    /// being narrated. Otherwise the previous utterance is torn down and
    /// a fresh attempt starts: remote first, local on request failure,
    /// silence when neither is available.
    pub async fn narrate_current(&self) {
        self.narrate(false).await;
    }

    /// Stop any active utterance and invalidate in-flight requests.
    /// Idempotent; safe to call from any state.
    pub fn stop_narration(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.lock().teardown();
    }

    /// Switch the remote voice. When narration is enabled this restarts
    /// the current text with the new voice even though the text is
    /// unchanged.
    pub async fn select_voice(&self, voice_id: &str) {
        let enabled = {
            let mut state = self.state.lock();
            state.selected_voice = if voice_id.is_empty() {
                None
            } else {
                Some(voice_id.to_string())
            };
            state.enabled
        };
        if enabled {
            self.narrate(true).await;
        }
    }

    /// Fetch the remote voice list and pick a default selection.
    ///
    /// Failure (or an empty list) leaves the selection unset; the remote
    /// backend then falls through to its server-side default voice.
    pub async fn load_voice_list(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
        let voices = self.remote.list_voices().await?;
        if let Some(best) = default_voice(&voices) {
            info!("Default narration voice: {}", best.name);
            self.state.lock().selected_voice = Some(best.voice_id.clone());
        }
        Ok(voices)
    }

    async fn narrate(&self, voice_changed: bool) {
        let text = self.content.current_text();
        if text.is_empty() {
            return;
        }

        let (generation, voice) = {
            let mut state = self.state.lock();
            if !voice_changed
                && state.phase != Phase::Idle
                && state.last_text.as_deref() == Some(text.as_str())
            {
                debug!("Already narrating unchanged text");
                return;
            }
            state.last_text = Some(text.clone());
            state.teardown();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.phase = Phase::RequestingRemote;
            (generation, state.selected_voice.clone())
        };

        debug!(generation, "Requesting remote synthesis");
        match self.remote.synthesize(&text, voice.as_deref()).await {
            Ok(audio) => self.start_remote_playback(generation, audio),
            Err(e) => {
                warn!("Remote synthesis failed: {}", e);
                self.start_local_fallback(generation, &text);
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn start_remote_playback(&self, generation: u64, audio: Bytes) {
        {
            let mut state = self.state.lock();
            if !self.is_current(generation) {
                debug!(generation, "Discarding stale synthesis result");
                return;
            }
            state.phase = Phase::PlayingRemote;
        }

        let state_ref = Arc::clone(&self.state);
        let generation_ref = Arc::clone(&self.generation);
        let on_done = Box::new(move |end: PlaybackEnd| {
            let mut state = state_ref.lock();
            if generation_ref.load(Ordering::SeqCst) != generation {
                return;
            }
            if end == PlaybackEnd::Failed {
                warn!("Audio playback failed");
            }
            state.phase = Phase::Idle;
            state.active = None;
        });

        match self.player.play(audio, on_done) {
            Ok(handle) => self.store_handle(generation, ActiveHandle::Remote(handle)),
            Err(e) => {
                warn!("Failed to start playback: {}", e);
                let mut state = self.state.lock();
                if self.is_current(generation) {
                    state.phase = Phase::Idle;
                    state.active = None;
                }
            }
        }
    }

    fn start_local_fallback(&self, generation: u64, text: &str) {
        if !self.local.is_available() {
            debug!("No local speech engine; narration stays silent");
            let mut state = self.state.lock();
            if self.is_current(generation) {
                state.phase = Phase::Idle;
                state.active = None;
            }
            return;
        }

        {
            let mut state = self.state.lock();
            if !self.is_current(generation) {
                return;
            }
            state.phase = Phase::RequestingLocal;
        }

        let events = UtteranceEvents {
            on_start: {
                let state_ref = Arc::clone(&self.state);
                let generation_ref = Arc::clone(&self.generation);
                Box::new(move || {
                    let mut state = state_ref.lock();
                    if generation_ref.load(Ordering::SeqCst) == generation
                        && state.phase == Phase::RequestingLocal
                    {
                        state.phase = Phase::PlayingLocal;
                    }
                })
            },
            on_end: {
                let state_ref = Arc::clone(&self.state);
                let generation_ref = Arc::clone(&self.generation);
                Box::new(move || {
                    let mut state = state_ref.lock();
                    if generation_ref.load(Ordering::SeqCst) == generation {
                        state.phase = Phase::Idle;
                        state.active = None;
                    }
                })
            },
            on_error: {
                let state_ref = Arc::clone(&self.state);
                let generation_ref = Arc::clone(&self.generation);
                Box::new(move |e| {
                    warn!("Local utterance failed: {}", e);
                    let mut state = state_ref.lock();
                    if generation_ref.load(Ordering::SeqCst) == generation {
                        state.phase = Phase::Idle;
                        state.active = None;
                    }
                })
            },
        };

        match self.local.speak(text, events) {
            Ok(control) => self.store_handle(generation, ActiveHandle::Local(control)),
            Err(e) => {
                warn!("Local synthesis failed to start: {}", e);
                let mut state = self.state.lock();
                if self.is_current(generation) {
                    state.phase = Phase::Idle;
                    state.active = None;
                }
            }
        }
    }

    /// Adopt a freshly created handle as the active utterance, unless the
    /// attempt was preempted or already finished in the meantime.
    fn store_handle(&self, generation: u64, mut handle: ActiveHandle) {
        let mut state = self.state.lock();
        if self.is_current(generation) && state.phase != Phase::Idle {
            state.active = Some(handle);
        } else {
            drop(state);
            handle.stop();
        }
    }
}

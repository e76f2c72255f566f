//! Shared test doubles for the narrator's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use storybook_core::{ContentSource, VoiceDescriptor};
use storybook_spk::engines::{
    LocalSynthesis, RemoteSynthesizer, UtteranceControl, UtteranceEvents,
};
use storybook_spk::error::SpeechError;
use storybook_spk::playback::{AudioPlayer, DoneCallback, PlaybackEnd, PlaybackHandle};

pub use storybook_spk::narrator::{Narrator, Phase};

/// Poll until `condition` holds, for up to two seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

pub fn voice(id: &str, name: &str) -> VoiceDescriptor {
    VoiceDescriptor {
        voice_id: id.to_string(),
        name: name.to_string(),
        category: String::new(),
    }
}

// --- content ---

pub struct FixedContent {
    text: Mutex<String>,
}

impl FixedContent {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Mutex::new(text.to_string()),
        })
    }

    pub fn set(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }
}

impl ContentSource for FixedContent {
    fn current_text(&self) -> String {
        self.text.lock().clone()
    }
}

// --- remote backend ---

pub enum RemoteReply {
    Audio(Vec<u8>),
    Fail,
    /// Block until the test resolves the request from outside.
    Wait(tokio::sync::oneshot::Receiver<Result<Vec<u8>, String>>),
}

pub struct ScriptedRemote {
    replies: Mutex<VecDeque<RemoteReply>>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
    voices: Mutex<Option<Result<Vec<VoiceDescriptor>, String>>>,
}

impl ScriptedRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            voices: Mutex::new(None),
        })
    }

    pub fn push(&self, reply: RemoteReply) {
        self.replies.lock().push_back(reply);
    }

    pub fn set_voices(&self, voices: Vec<VoiceDescriptor>) {
        *self.voices.lock() = Some(Ok(voices));
    }

    pub fn fail_voices(&self) {
        *self.voices.lock() = Some(Err("scripted voice failure".to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn call(&self, index: usize) -> (String, Option<String>) {
        self.calls.lock()[index].clone()
    }
}

#[async_trait]
impl RemoteSynthesizer for ScriptedRemote {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> Result<Bytes, SpeechError> {
        self.calls
            .lock()
            .push((text.to_string(), voice_id.map(|v| v.to_string())));
        let reply = self.replies.lock().pop_front();
        match reply {
            None => Ok(Bytes::from_static(b"audio")),
            Some(RemoteReply::Audio(bytes)) => Ok(Bytes::from(bytes)),
            Some(RemoteReply::Fail) => Err(SpeechError::Remote("scripted failure".to_string())),
            Some(RemoteReply::Wait(rx)) => match rx.await {
                Ok(Ok(bytes)) => Ok(Bytes::from(bytes)),
                Ok(Err(e)) => Err(SpeechError::Remote(e)),
                Err(_) => Err(SpeechError::Remote("request abandoned".to_string())),
            },
        }
    }

    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
        match self.voices.lock().clone() {
            Some(Ok(voices)) => Ok(voices),
            Some(Err(e)) => Err(SpeechError::Remote(e)),
            None => Ok(Vec::new()),
        }
    }
}

// --- player ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    /// Keep playing until the handle is stopped.
    Hold,
    FinishImmediately,
    FailImmediately,
}

pub struct FakePlayer {
    mode: PlayerMode,
    pub plays: Mutex<Vec<Bytes>>,
    active: Arc<Mutex<usize>>,
    max_active: Arc<Mutex<usize>>,
}

impl FakePlayer {
    pub fn new(mode: PlayerMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            plays: Mutex::new(Vec::new()),
            active: Arc::new(Mutex::new(0)),
            max_active: Arc::new(Mutex::new(0)),
        })
    }

    pub fn play_count(&self) -> usize {
        self.plays.lock().len()
    }

    pub fn active_count(&self) -> usize {
        *self.active.lock()
    }

    pub fn max_active(&self) -> usize {
        *self.max_active.lock()
    }
}

impl AudioPlayer for FakePlayer {
    fn play(
        &self,
        audio: Bytes,
        on_done: DoneCallback,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        self.plays.lock().push(audio);
        match self.mode {
            PlayerMode::FinishImmediately => {
                on_done(PlaybackEnd::Finished);
                Ok(Box::new(InertHandle))
            }
            PlayerMode::FailImmediately => {
                on_done(PlaybackEnd::Failed);
                Ok(Box::new(InertHandle))
            }
            PlayerMode::Hold => {
                {
                    let mut active = self.active.lock();
                    *active += 1;
                    let mut max = self.max_active.lock();
                    if *active > *max {
                        *max = *active;
                    }
                }
                Ok(Box::new(HeldHandle {
                    active: Arc::clone(&self.active),
                    done: Some(on_done),
                    released: false,
                }))
            }
        }
    }
}

struct InertHandle;

impl PlaybackHandle for InertHandle {
    fn stop(&mut self) {}
}

struct HeldHandle {
    active: Arc<Mutex<usize>>,
    done: Option<DoneCallback>,
    released: bool,
}

impl HeldHandle {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            *self.active.lock() -= 1;
        }
    }
}

impl PlaybackHandle for HeldHandle {
    fn stop(&mut self) {
        self.release();
        // Dropped without firing: nothing may complete after a stop.
        self.done.take();
    }
}

impl Drop for HeldHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// --- local engine ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalMode {
    /// Keep speaking until stopped.
    Hold,
    EndImmediately,
    ErrorImmediately,
}

pub struct FakeLocal {
    available: bool,
    mode: LocalMode,
    pub spoken: Mutex<Vec<String>>,
    stops: Arc<Mutex<usize>>,
}

impl FakeLocal {
    pub fn available(mode: LocalMode) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            mode,
            spoken: Mutex::new(Vec::new()),
            stops: Arc::new(Mutex::new(0)),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            mode: LocalMode::Hold,
            spoken: Mutex::new(Vec::new()),
            stops: Arc::new(Mutex::new(0)),
        })
    }

    pub fn spoken_count(&self) -> usize {
        self.spoken.lock().len()
    }

    pub fn stop_count(&self) -> usize {
        *self.stops.lock()
    }
}

impl LocalSynthesis for FakeLocal {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(
        &self,
        text: &str,
        events: UtteranceEvents,
    ) -> Result<Box<dyn UtteranceControl>, SpeechError> {
        if !self.available {
            return Err(SpeechError::Engine("no local engine".to_string()));
        }
        self.spoken.lock().push(text.to_string());
        (events.on_start)();
        match self.mode {
            LocalMode::Hold => {}
            LocalMode::EndImmediately => (events.on_end)(),
            LocalMode::ErrorImmediately => {
                (events.on_error)(SpeechError::Engine("scripted engine failure".to_string()))
            }
        }
        Ok(Box::new(FakeUtterance {
            stops: Arc::clone(&self.stops),
            stopped: false,
        }))
    }
}

struct FakeUtterance {
    stops: Arc<Mutex<usize>>,
    stopped: bool,
}

impl UtteranceControl for FakeUtterance {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            *self.stops.lock() += 1;
        }
    }
}

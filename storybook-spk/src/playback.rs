//! Audio playback for remote narration
//!
//! The narrator hands synthesized audio to an [`AudioPlayer`] and keeps
//! the returned handle as the single active utterance. The rodio
//! implementation runs each utterance on its own thread because the
//! output stream cannot move between threads.

use crate::error::SpeechError;
use bytes::Bytes;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const PLAYBACK_POLL: Duration = Duration::from_millis(25);

/// How one playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished,
    Failed,
}

pub type DoneCallback = Box<dyn FnOnce(PlaybackEnd) + Send>;

/// Control over one in-progress audio playback.
pub trait PlaybackHandle: Send {
    /// Stop playback and release the decoded audio. Idempotent; the
    /// done callback does not fire after a stop.
    fn stop(&mut self);
}

/// Playback seam. `on_done` fires at most once: when the audio finishes
/// or fails to decode/play, and never after `stop()`.
pub trait AudioPlayer: Send + Sync {
    fn play(
        &self,
        audio: Bytes,
        on_done: DoneCallback,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError>;
}

/// rodio-backed player.
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(
        &self,
        audio: Bytes,
        on_done: DoneCallback,
    ) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        let stopped = Arc::new(AtomicBool::new(false));
        let thread_stopped = Arc::clone(&stopped);

        std::thread::spawn(move || {
            let fail = |on_done: DoneCallback, stopped: &AtomicBool, msg: String| {
                warn!("{}", msg);
                if !stopped.load(Ordering::SeqCst) {
                    on_done(PlaybackEnd::Failed);
                }
            };

            // The stream must outlive the sink; both stay on this thread.
            let (_stream, handle) = match rodio::OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    return fail(
                        on_done,
                        &thread_stopped,
                        format!("No audio output device: {}", e),
                    )
                }
            };

            let sink = match rodio::Sink::try_new(&handle) {
                Ok(sink) => sink,
                Err(e) => {
                    return fail(
                        on_done,
                        &thread_stopped,
                        format!("Failed to open audio sink: {}", e),
                    )
                }
            };

            let source = match rodio::Decoder::new(Cursor::new(audio)) {
                Ok(source) => source,
                Err(e) => {
                    return fail(
                        on_done,
                        &thread_stopped,
                        format!("Failed to decode audio: {}", e),
                    )
                }
            };

            sink.append(source);
            loop {
                if thread_stopped.load(Ordering::SeqCst) {
                    sink.stop();
                    return;
                }
                if sink.empty() {
                    on_done(PlaybackEnd::Finished);
                    return;
                }
                std::thread::sleep(PLAYBACK_POLL);
            }
        });

        Ok(Box::new(RodioHandle { stopped }))
    }
}

struct RodioHandle {
    stopped: Arc<AtomicBool>,
}

impl PlaybackHandle for RodioHandle {
    fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Playback stopped");
    }
}

//! Local fallback engine backed by espeak-ng
//!
//! Speaks through a child process rather than a synthesis API: lower
//! fidelity than the remote voice, but it works offline. Utterance
//! lifecycle is reported through [`UtteranceEvents`]; a monitor thread
//! maps process exit onto the end/error events.

use crate::engines::{LocalSynthesis, UtteranceControl, UtteranceEvents};
use crate::error::SpeechError;
use parking_lot::Mutex;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const MONITOR_POLL: Duration = Duration::from_millis(25);

pub struct EspeakEngine {
    command: String,
    rate: u32,
    available: bool,
}

impl EspeakEngine {
    /// Probe for the engine binary once; a missing binary makes the
    /// whole local tier unavailable rather than failing per utterance.
    pub fn new(command: &str, rate: u32) -> Self {
        let available = Command::new(command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok();

        if available {
            debug!("Local speech engine '{}' available", command);
        } else {
            warn!("Local speech engine '{}' not found", command);
        }

        Self {
            command: command.to_string(),
            rate,
            available,
        }
    }
}

impl LocalSynthesis for EspeakEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(
        &self,
        text: &str,
        events: UtteranceEvents,
    ) -> Result<Box<dyn UtteranceControl>, SpeechError> {
        if !self.available {
            return Err(SpeechError::Engine(format!(
                "'{}' is not installed",
                self.command
            )));
        }

        let child = Command::new(&self.command)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                SpeechError::Engine(format!("Failed to start '{}': {}", self.command, e))
            })?;

        (events.on_start)();

        let child = Arc::new(Mutex::new(child));
        let stopped = Arc::new(AtomicBool::new(false));

        let monitor_child = Arc::clone(&child);
        let monitor_stopped = Arc::clone(&stopped);
        let on_end = events.on_end;
        let on_error = events.on_error;
        std::thread::spawn(move || loop {
            if monitor_stopped.load(Ordering::SeqCst) {
                // Preempted; the stopping side reaps the process.
                return;
            }
            let status = monitor_child.lock().try_wait();
            match status {
                Ok(Some(status)) => {
                    if status.success() {
                        on_end();
                    } else {
                        on_error(SpeechError::Engine(format!(
                            "Speech process exited with {}",
                            status
                        )));
                    }
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    on_error(SpeechError::Engine(format!(
                        "Failed to wait on speech process: {}",
                        e
                    )));
                    return;
                }
            }
            std::thread::sleep(MONITOR_POLL);
        });

        Ok(Box::new(EspeakUtterance { child, stopped }))
    }
}

struct EspeakUtterance {
    child: Arc<Mutex<Child>>,
    stopped: Arc<AtomicBool>,
}

impl UtteranceControl for EspeakUtterance {
    fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut child = self.child.lock();
        if let Err(e) = child.kill() {
            debug!("Speech process already exited: {}", e);
        }
        let _ = child.wait();
    }
}

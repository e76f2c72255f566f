//! Error types for storybook-spk

use storybook_core::Error as CoreError;
use thiserror::Error;

/// Narration errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Remote synthesis error: {0}")]
    Remote(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

//! storybook-spk: narration for the storybook
//!
//! Provides read-aloud narration with:
//! - remote synthesis through the narration proxy
//! - a local espeak-ng fallback when the remote voice is unreachable
//! - at most one active utterance, newest request wins

pub mod config;
pub mod engines;
pub mod error;
pub mod narrator;
pub mod playback;
pub mod voices;

pub use config::NarratorConfig;
pub use error::SpeechError;
pub use narrator::{Narrator, Phase};
pub use voices::{default_voice, PREFERRED_VOICE_NAMES};

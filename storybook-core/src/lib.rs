//! storybook-core: shared types for the storybook narration system
//!
//! Holds what both halves of the system need:
//! - the storybook content model (pages, page tracking, readable text)
//! - the `ContentSource` seam consumed by the narrator
//! - the voice/TTS wire types exchanged with the narration proxy

pub mod book;
pub mod content;
pub mod error;
pub mod voice;

pub use book::{Page, Storybook};
pub use content::ContentSource;
pub use error::{Error, Result};
pub use voice::{ErrorBody, TtsRequest, VoiceDescriptor, VoiceListResponse};

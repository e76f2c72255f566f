//! storybook-server: narration proxy for the storybook UI
//!
//! Two JSON-over-HTTP routes in front of the ElevenLabs API, so the
//! provider credential stays on the server, plus static file serving
//! for the book's web assets.

pub mod config;
pub mod http;
pub mod vendor;

pub use config::ServerConfig;
pub use http::{build_router, ApiState};
pub use vendor::{ElevenLabsVendor, VendorError, VoiceVendor};

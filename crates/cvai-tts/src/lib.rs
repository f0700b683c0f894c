//! Text-to-speech provider clients.
//!
//! This crate provides:
//! - HTTP clients for the ElevenLabs and UnrealSpeech synthesis APIs
//! - A router that normalizes all providers (including the client-side
//!   `webspeech` directive) into a single output type

pub mod elevenlabs;
pub mod error;
pub mod router;
pub mod types;
pub mod unrealspeech;

pub use elevenlabs::{ElevenLabsClient, ElevenLabsConfig};
pub use error::{TtsError, TtsResult};
pub use router::TtsRouter;
pub use types::{SpeechOutput, SynthesisRequest, AUDIO_CONTENT_TYPE};
pub use unrealspeech::{UnrealSpeechClient, UnrealSpeechConfig};

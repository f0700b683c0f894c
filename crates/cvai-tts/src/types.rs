//! Shared request/response types for speech synthesis.

/// Content type of synthesized audio from both HTTP providers.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// One synthesis request, as the gateway hands it to a provider client.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Text to synthesize.
    pub text: String,
    /// Provider-specific voice id; each provider has its own default.
    pub voice: Option<String>,
}

/// Normalized synthesis result across providers.
#[derive(Debug, Clone)]
pub enum SpeechOutput {
    /// Raw audio bytes from a server-side provider.
    Audio(Vec<u8>),
    /// No server-side audio: the caller synthesizes locally via the Web
    /// Speech API. Usage is still counted for this outcome.
    ClientSide,
}

impl SpeechOutput {
    /// Audio payload size, if any.
    pub fn byte_len(&self) -> usize {
        match self {
            SpeechOutput::Audio(bytes) => bytes.len(),
            SpeechOutput::ClientSide => 0,
        }
    }
}

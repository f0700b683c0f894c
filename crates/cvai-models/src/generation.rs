//! Generation mode and TTS provider enumerations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Generation category. Each mode has its own independent daily quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Normal,
    Cinematic,
}

impl Mode {
    /// Parse from string. Unknown values are rejected, not defaulted: the
    /// gateway must answer 400 for anything outside the two modes.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Mode::Normal),
            "cinematic" => Some(Mode::Cinematic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Cinematic => "cinematic",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend text-to-speech engine selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Client-side Web Speech API; no server-side audio is produced.
    Webspeech,
    Elevenlabs,
    Unrealspeech,
}

impl Provider {
    /// Parse from string, rejecting unknown providers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "webspeech" => Some(Provider::Webspeech),
            "elevenlabs" => Some(Provider::Elevenlabs),
            "unrealspeech" => Some(Provider::Unrealspeech),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Webspeech => "webspeech",
            Provider::Elevenlabs => "elevenlabs",
            Provider::Unrealspeech => "unrealspeech",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("normal"), Some(Mode::Normal));
        assert_eq!(Mode::parse("cinematic"), Some(Mode::Cinematic));
        assert_eq!(Mode::parse("dramatic"), None);
        assert_eq!(Mode::parse("Normal"), None);
        assert_eq!(Mode::parse(""), None);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("webspeech"), Some(Provider::Webspeech));
        assert_eq!(Provider::parse("elevenlabs"), Some(Provider::Elevenlabs));
        assert_eq!(Provider::parse("unrealspeech"), Some(Provider::Unrealspeech));
        assert_eq!(Provider::parse("espeak"), None);
    }

    #[test]
    fn test_serde_matches_parse() {
        let mode: Mode = serde_json::from_str("\"cinematic\"").unwrap();
        assert_eq!(mode, Mode::Cinematic);
        assert_eq!(serde_json::to_string(&Provider::Elevenlabs).unwrap(), "\"elevenlabs\"");
    }
}

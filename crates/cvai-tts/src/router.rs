//! Provider dispatch.

use cvai_models::Provider;
use tracing::debug;

use crate::elevenlabs::{ElevenLabsClient, ElevenLabsConfig};
use crate::error::{TtsError, TtsResult};
use crate::types::{SpeechOutput, SynthesisRequest};
use crate::unrealspeech::{UnrealSpeechClient, UnrealSpeechConfig};

/// Routes synthesis requests to the selected provider and normalizes the
/// results into one output type.
///
/// Providers whose API key is absent at startup stay unconfigured; selecting
/// one at request time is an error surfaced to the caller, matching how the
/// original service answered when a key was missing.
pub struct TtsRouter {
    elevenlabs: Option<ElevenLabsClient>,
    unrealspeech: Option<UnrealSpeechClient>,
}

impl TtsRouter {
    /// Create a router with explicit clients (used by tests).
    pub fn new(
        elevenlabs: Option<ElevenLabsClient>,
        unrealspeech: Option<UnrealSpeechClient>,
    ) -> Self {
        Self {
            elevenlabs,
            unrealspeech,
        }
    }

    /// Build clients for every provider with a configured API key.
    pub fn from_env() -> TtsResult<Self> {
        let elevenlabs = match ElevenLabsConfig::from_env() {
            Some(config) => Some(ElevenLabsClient::new(config)?),
            None => None,
        };
        let unrealspeech = match UnrealSpeechConfig::from_env() {
            Some(config) => Some(UnrealSpeechClient::new(config)?),
            None => None,
        };
        Ok(Self {
            elevenlabs,
            unrealspeech,
        })
    }

    /// Synthesize speech with the selected provider.
    ///
    /// `webspeech` never touches the network: the extension synthesizes
    /// locally, and the gateway only records usage.
    pub async fn synthesize(
        &self,
        provider: Provider,
        request: &SynthesisRequest,
    ) -> TtsResult<SpeechOutput> {
        match provider {
            Provider::Webspeech => {
                debug!("Web Speech request, deferring synthesis to the client");
                Ok(SpeechOutput::ClientSide)
            }
            Provider::Elevenlabs => match &self.elevenlabs {
                Some(client) => client.synthesize(request).await,
                None => Err(TtsError::NotConfigured(provider)),
            },
            Provider::Unrealspeech => match &self.unrealspeech {
                Some(client) => client.synthesize(request).await,
                None => Err(TtsError::NotConfigured(provider)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_webspeech_is_client_side_without_network() {
        let router = TtsRouter::new(None, None);
        let output = router
            .synthesize(
                Provider::Webspeech,
                &SynthesisRequest {
                    text: "hello".to_string(),
                    voice: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(output, SpeechOutput::ClientSide));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_an_error() {
        let router = TtsRouter::new(None, None);
        let err = router
            .synthesize(
                Provider::Elevenlabs,
                &SynthesisRequest {
                    text: "hello".to_string(),
                    voice: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::NotConfigured(Provider::Elevenlabs)));
    }
}

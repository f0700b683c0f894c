//! Application state.

use std::sync::Arc;

use cvai_supabase::{ProfileRepository, SupabaseClient, UsageLedger};
use cvai_tts::TtsRouter;

use crate::config::ApiConfig;
use crate::services::QuotaService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub supabase: Arc<SupabaseClient>,
    pub tts: Arc<TtsRouter>,
    pub quota: QuotaService,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let supabase = SupabaseClient::from_env()?;
        let tts = TtsRouter::from_env()?;
        Ok(Self::from_parts(config, supabase, tts))
    }

    /// Assemble state from already-built clients. Tests use this to point the
    /// server at mock backends.
    pub fn from_parts(config: ApiConfig, supabase: SupabaseClient, tts: TtsRouter) -> Self {
        let profiles = ProfileRepository::new(supabase.clone());
        let ledger = UsageLedger::new(supabase.clone());
        let quota = QuotaService::new(profiles, ledger);

        Self {
            config,
            supabase: Arc::new(supabase),
            tts: Arc::new(tts),
            quota,
        }
    }
}

//! Application state: prompts, generation settings and the optional OpenAI client.
//!
//! Built once at start-up and shared read-only behind an `Arc`.

use tracing::{info, instrument};

use crate::config::{load_app_config_from_env, AppConfig, GenerationSettings, Prompts};
use crate::openai::OpenAI;

#[derive(Clone, Debug)]
pub struct AppState {
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
    pub generation: GenerationSettings,
}

impl AppState {
    /// Build state from env: load config, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_app_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "bootcamp_curriculum", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "bootcamp_curriculum", "OpenAI disabled (no OPENAI_API_KEY). Manual entry only.");
        }
        info!(
            target: "bootcamp_curriculum",
            max_retries = cfg.generation.max_retries,
            base_delay_ms = cfg.generation.base_delay_ms,
            delivery_mode = %cfg.generation.delivery_mode,
            "Generation settings"
        );

        Self::with_parts(cfg, openai)
    }

    pub fn with_parts(cfg: AppConfig, openai: Option<OpenAI>) -> Self {
        Self { openai, prompts: cfg.prompts, generation: cfg.generation }
    }

    pub fn generation_enabled(&self) -> bool {
        self.openai.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

//! Loading service configuration (prompts + generation tuning) from TOML.
//!
//! See `AppConfig`, `Prompts` and `GenerationSettings` for expected schema.
//! Every table and key is optional; missing ones fall back to defaults.
//!
//! ```toml
//! [prompts]
//! system = "You design intensive technology bootcamps."
//!
//! [generation]
//! temperature = 0.5
//! max_retries = 2
//! base_delay_ms = 1000
//! delivery_mode = "Online"
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::DeliveryMode;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationSettings,
}

/// Knobs for the generation call. Retries apply to transport failures and
/// non-success statuses; waits double from `base_delay_ms`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
  pub temperature: f32,
  pub max_retries: u32,
  pub base_delay_ms: u64,
  /// The form does not ask for a delivery mode, so the prompt uses this one.
  pub delivery_mode: DeliveryMode,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    Self { temperature: 0.7, max_retries: 3, base_delay_ms: 3_000, delivery_mode: DeliveryMode::Hybrid }
  }
}

impl GenerationSettings {
  /// Wait before the retry that follows attempt `attempt` (0-based).
  pub fn backoff(&self, attempt: u32) -> Duration {
    Duration::from_millis(self.base_delay_ms.saturating_mul(1u64 << attempt.min(16)))
  }
}

/// Prompts used by the OpenAI client. The user template understands
/// `{name}`, `{duration_weeks}`, `{level}`, `{level_hint}`, `{delivery_mode}`,
/// `{delivery_hint}`, `{description}` and `{context_section}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub system: String,
  pub user_template: String,
  /// Wrapped around the additional context; `{context}` is replaced.
  pub context_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are an expert in designing intensive bootcamp and workshop programs in technology and coding. Respond ONLY with strict JSON.".into(),
      user_template: DEFAULT_USER_TEMPLATE.into(),
      context_template: "\n## Additional context\n{context}\n".into(),
    }
  }
}

const DEFAULT_USER_TEMPLATE: &str = r#"Create a complete bootcamp/workshop program plan for:

## Bootcamp
- Name: {name}
- Duration: {duration_weeks} weeks
- Level: {level} ({level_hint})
- Delivery mode: {delivery_mode} ({delivery_hint})
- Description: {description}
{context_section}
## Output
Return one JSON object with exactly this shape (no Markdown, no commentary):

{
  "identity": { "name": "...", "code": "BOOT-001", "durationWeeks": 8, "deliveryMode": "Online|Offline|Hybrid", "level": "Beginner|Intermediate|Advanced", "capacity": 20 },
  "description": "5-7 sentences on goals, scope, method and benefits",
  "tagline": "one catchy sentence",
  "targetAudience": { "description": "...", "backgrounds": ["..."], "technicalPrerequisites": ["..."], "softSkillPrerequisites": ["..."] },
  "learningOutcomes": [ { "code": "LO-1", "statement": "...", "category": "Technical|Soft Skill|Portfolio" } ],
  "weeks": [
    {
      "weekNumber": 1,
      "theme": "...",
      "outcomeCodes": ["LO-1"],
      "coreTopics": ["..."],
      "teachingMethod": { "method": "Lecture + Workshop", "description": "...", "activity": "..." },
      "timeAllocation": "Lecture 2x120', Workshop 3x180'",
      "project": { "name": "...", "description": "...", "deliverables": ["..."], "technologies": ["..."] },
      "learningExperience": "...",
      "assessment": { "criteria": "...", "weight": 10 }
    }
  ],
  "assessment": [ { "name": "...", "description": "...", "weight": 25, "method": "...", "criteria": ["..."] } ],
  "instructors": [ { "name": "...", "expertise": ["..."], "role": "Lead Instructor" } ],
  "toolsResources": { "software": ["..."], "platforms": ["..."], "requiredAccounts": ["..."] },
  "certification": { "name": "...", "graduationRequirements": ["..."], "minPassingScore": 70, "benefits": ["..."] },
  "references": ["real, accessible books, docs or courses"]
}

## Rules
- Exactly {duration_weeks} entries in "weeks", numbered 1 to {duration_weeks}.
- "project" and "assessment" inside a week are optional; omit them when not needed.
- Every week: teachingMethod.description and teachingMethod.activity at least 20 words, learningExperience at least 30 words, assessment.criteria (if present) at least 20 words.
- Learning outcome codes are unique; weeks only reference codes that exist.
- Cover Technical, Soft Skill and Portfolio outcomes.
- Assessment component weights total 100. Weekly assessment weights, if any, total 100.
- Core topics are specific and practical, not generic.
- Vary teaching methods: Lecture, Workshop, Project-Based, Case Study, Peer Learning."#;

/// Attempt to load `AppConfig` from CURRICULUM_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CURRICULUM_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_app_config(&s) {
      Ok(cfg) => {
        info!(target: "bootcamp_curriculum", %path, "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "bootcamp_curriculum", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "bootcamp_curriculum", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_app_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_yields_defaults() {
    let cfg = parse_app_config("").unwrap();
    assert_eq!(cfg.generation.max_retries, 3);
    assert_eq!(cfg.generation.base_delay_ms, 3_000);
    assert_eq!(cfg.generation.delivery_mode, DeliveryMode::Hybrid);
    assert!(cfg.prompts.user_template.contains("{duration_weeks}"));
  }

  #[test]
  fn partial_tables_override_only_given_keys() {
    let cfg = parse_app_config(
      r#"
        [prompts]
        system = "Be brief."

        [generation]
        max_retries = 1
        delivery_mode = "Online"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.prompts.system, "Be brief.");
    assert_eq!(cfg.prompts.user_template, Prompts::default().user_template);
    assert_eq!(cfg.generation.max_retries, 1);
    assert_eq!(cfg.generation.temperature, 0.7);
    assert_eq!(cfg.generation.delivery_mode, DeliveryMode::Online);
  }

  #[test]
  fn unknown_delivery_mode_is_rejected() {
    assert!(parse_app_config("[generation]\ndelivery_mode = \"Blended\"").is_err());
  }

  #[test]
  fn backoff_doubles_from_base() {
    let g = GenerationSettings::default();
    assert_eq!(g.backoff(0), Duration::from_secs(3));
    assert_eq!(g.backoff(1), Duration::from_secs(6));
    assert_eq!(g.backoff(2), Duration::from_secs(12));
  }
}

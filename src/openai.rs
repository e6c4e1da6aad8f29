//! Minimal OpenAI client for curriculum generation.
//!
//! We only call chat.completions and request a strict JSON object. Calls are
//! instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short to avoid PII leaks.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::{GenerationSettings, Prompts};
use crate::domain::CurriculumDocument;
use crate::util::{extract_json, fill_template, trunc_for_log};
use crate::validate::ValidRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Full curricula are long; generation routinely takes minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
  #[error("curriculum generation is disabled (OPENAI_API_KEY not set)")]
  Disabled,
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("OpenAI HTTP {status}: {message}")]
  Upstream { status: u16, message: String },
  #[error("model returned an empty response")]
  EmptyResponse,
  #[error("could not parse generated curriculum: {0}")]
  Parse(String),
}

impl GenerationError {
  /// Transport failures and upstream statuses are worth another attempt;
  /// a reply we cannot parse will not improve by resending.
  pub fn is_retryable(&self) -> bool {
    matches!(self, GenerationError::Transport(_) | GenerationError::Upstream { .. })
  }
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl std::fmt::Debug for OpenAI {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OpenAI").field("base_url", &self.base_url).field("model", &self.model).finish()
  }
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    let timeout = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    match Self::new(api_key, base_url, model, Duration::from_secs(timeout)) {
      Ok(oa) => Some(oa),
      Err(e) => {
        error!(target: "bootcamp_curriculum", error = %e, "Failed to build HTTP client; generation disabled");
        None
      }
    }
  }

  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self, GenerationError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let base_url = base_url.trim_end_matches('/').to_string();
    Ok(Self { client, api_key, base_url, model })
  }

  /// JSON-object chat completion. Returns the raw message content.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json_text(&self, system: &str, user: &str, temperature: f32) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
      max_tokens: None,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "bootcamp-curriculum/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(GenerationError::Upstream { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
  }

  /// Chat call with exponential backoff on retryable failures.
  async fn chat_with_retries(
    &self,
    settings: &GenerationSettings,
    system: &str,
    user: &str,
  ) -> Result<String, GenerationError> {
    let attempts = settings.max_retries.max(1);
    let mut attempt = 0;
    loop {
      match self.chat_json_text(system, user, settings.temperature).await {
        Ok(text) => return Ok(text),
        Err(e) if e.is_retryable() && attempt + 1 < attempts => {
          let wait = settings.backoff(attempt);
          warn!(target: "curriculum", attempt = attempt + 1, attempts, ?wait, error = %e, "Generation attempt failed; retrying");
          tokio::time::sleep(wait).await;
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }

  // --- High-level helpers (domain-specialized) ---

  /// Generate a full curriculum for a validated request.
  ///
  /// The request's name, level and duration override whatever the model put
  /// in the identity block. The week list is returned as generated.
  #[instrument(
    level = "info",
    skip(self, prompts, settings, req),
    fields(name = %req.name, weeks = req.weeks(), level = %req.level, model = %self.model)
  )]
  pub async fn generate_curriculum(
    &self,
    prompts: &Prompts,
    settings: &GenerationSettings,
    req: &ValidRequest,
  ) -> Result<CurriculumDocument, GenerationError> {
    let user = build_user_prompt(prompts, settings, req);
    let start = Instant::now();
    let result = self.chat_with_retries(settings, &prompts.system, &user).await;
    let elapsed = start.elapsed();

    let text = match result {
      Ok(t) => {
        info!(?elapsed, response_len = t.len(), "Model response received successfully");
        t
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during curriculum generation");
        return Err(e);
      }
    };

    let mut doc = parse_curriculum(&text)?;
    doc.identity.name = req.name.trim().to_string();
    doc.identity.level = req.level;
    doc.identity.duration_weeks = req.weeks();

    info!(
      target: "curriculum",
      outcomes = doc.learning_outcomes.len(),
      weeks = doc.weeks.len(),
      assessment = doc.assessment.len(),
      instructors = doc.instructors.len(),
      references = doc.references.len(),
      "Curriculum successfully generated"
    );
    Ok(doc)
  }
}

/// Fill the user prompt template for a request.
pub fn build_user_prompt(prompts: &Prompts, settings: &GenerationSettings, req: &ValidRequest) -> String {
  let context_section = req
    .context()
    .map(|c| fill_template(&prompts.context_template, &[("context", c)]))
    .unwrap_or_default();
  let weeks = req.weeks().to_string();
  fill_template(
    &prompts.user_template,
    &[
      ("name", req.name.trim()),
      ("duration_weeks", &weeks),
      ("level", req.level.as_str()),
      ("level_hint", req.level.depth_hint()),
      ("delivery_mode", settings.delivery_mode.as_str()),
      ("delivery_hint", settings.delivery_mode.describe()),
      ("description", req.description.trim()),
      ("context_section", &context_section),
    ],
  )
}

/// Recover and deserialize a curriculum from model output.
pub fn parse_curriculum(text: &str) -> Result<CurriculumDocument, GenerationError> {
  let value = extract_json(text).map_err(GenerationError::Parse)?;
  serde_json::from_value(value).map_err(|e| GenerationError::Parse(e.to_string()))
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::domain::{CurriculumRequest, Level};
  use crate::validate::validate;

  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
  use serde_json::{json, Value};

  pub(crate) fn sample_generated() -> Value {
    json!({
      "identity": { "name": "Model Name", "code": "BOOT-009", "durationWeeks": 2, "deliveryMode": "Online", "level": "Advanced", "capacity": 25 },
      "description": "A bootcamp.",
      "tagline": "Ship it.",
      "learningOutcomes": [ { "code": "LO-1", "statement": "Build APIs", "category": "Technical" } ],
      "weeks": [
        { "weekNumber": 1, "theme": "Intro", "outcomeCodes": ["LO-1"], "coreTopics": ["HTTP"],
          "teachingMethod": { "method": "Lecture", "description": "d", "activity": "a" },
          "timeAllocation": "Lecture 2x120'", "learningExperience": "e" },
        { "weekNumber": 2, "theme": "Deeper", "outcomeCodes": ["LO-1"], "coreTopics": ["Auth"],
          "teachingMethod": { "method": "Workshop", "description": "d", "activity": "a" },
          "timeAllocation": "Workshop 3x180'", "learningExperience": "e",
          "project": { "name": "API", "description": "REST", "deliverables": ["repo"], "technologies": ["Rust"] } }
      ],
      "assessment": [ { "name": "Capstone", "description": "d", "weight": 100, "method": "Demo", "criteria": [] } ],
      "certification": { "name": "Cert", "graduationRequirements": [], "minPassingScore": 75, "benefits": [] },
      "references": ["The Rust Book"]
    })
  }

  /// Behaviour of the in-process chat completions mock.
  #[derive(Clone)]
  pub(crate) enum Upstream {
    /// Answer 200 with this message content.
    Content(String),
    /// Fail with 503 this many times, then answer with the content.
    FlakyThen(usize, String),
    /// Always answer with this status and an OpenAI-style error body.
    Fail(u16, String),
  }

  #[derive(Clone)]
  struct Mock { behaviour: Upstream, calls: Arc<AtomicUsize> }

  async fn completions(State(mock): State<Mock>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let n = mock.calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["response_format"]["type"], "json_object");
    let ok = |content: &str| {
      (StatusCode::OK, Json(json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
      })))
    };
    match &mock.behaviour {
      Upstream::Content(c) => ok(c.as_str()),
      Upstream::FlakyThen(fails, c) if n >= *fails => ok(c.as_str()),
      Upstream::FlakyThen(..) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": { "message": "overloaded" } }))),
      Upstream::Fail(status, msg) => (
        StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "error": { "message": msg } })),
      ),
    }
  }

  /// Serve the mock on an ephemeral port; returns the base URL and call counter.
  pub(crate) async fn spawn_upstream(behaviour: Upstream) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
      .route("/chat/completions", post(completions))
      .with_state(Mock { behaviour, calls: calls.clone() });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), calls)
  }

  pub(crate) fn client_for(base_url: &str) -> OpenAI {
    OpenAI::new("test-key".into(), base_url.into(), "gpt-test".into(), Duration::from_secs(5)).unwrap()
  }

  pub(crate) fn fast_settings() -> GenerationSettings {
    GenerationSettings { base_delay_ms: 1, ..Default::default() }
  }

  fn request(context: Option<&str>) -> ValidRequest {
    validate(&CurriculumRequest {
      name: "Fullstack Bootcamp".into(),
      duration_weeks: 10,
      level: Level::Beginner,
      description: "Learn web dev".into(),
      additional_context: context.map(str::to_string),
    })
    .unwrap()
  }

  #[test]
  fn prompt_carries_request_fields() {
    let p = build_user_prompt(&Prompts::default(), &GenerationSettings::default(), &request(Some("Focus on React")));
    assert!(p.contains("- Name: Fullstack Bootcamp"));
    assert!(p.contains("- Duration: 10 weeks"));
    assert!(p.contains("- Level: Beginner"));
    assert!(p.contains("- Delivery mode: Hybrid"));
    assert!(p.contains("Exactly 10 entries"));
    assert!(p.contains("## Additional context\nFocus on React"));
    assert!(!p.contains("{context_section}"));
  }

  #[test]
  fn blank_context_leaves_no_section() {
    let p = build_user_prompt(&Prompts::default(), &GenerationSettings::default(), &request(Some("   ")));
    assert!(!p.contains("Additional context"));
  }

  #[test]
  fn parse_curriculum_accepts_fenced_output() {
    let text = format!("```json\n{}\n```", sample_generated());
    let doc = parse_curriculum(&text).unwrap();
    assert_eq!(doc.weeks.len(), 2);
    assert!(doc.weeks[1].project.is_some());
  }

  #[test]
  fn parse_curriculum_rejects_out_of_set_enums() {
    let mut v = sample_generated();
    v["identity"]["level"] = json!("Expert");
    let err = parse_curriculum(&v.to_string()).unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
  }

  #[test]
  fn openai_error_body_is_extracted() {
    let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Invalid API key"));
    assert_eq!(extract_openai_error("<html>"), None);
  }

  #[tokio::test]
  async fn generation_overrides_identity_from_request() {
    let (url, calls) = spawn_upstream(Upstream::Content(sample_generated().to_string())).await;
    let oa = client_for(&url);
    let doc = oa.generate_curriculum(&Prompts::default(), &fast_settings(), &request(None)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(doc.identity.name, "Fullstack Bootcamp");
    assert_eq!(doc.identity.level, Level::Beginner);
    assert_eq!(doc.identity.duration_weeks, 10);
    assert_eq!(doc.identity.code, "BOOT-009");
    // Week list stays as generated.
    assert_eq!(doc.weeks.len(), 2);
    assert!(doc.id.is_none() && doc.created_at.is_none());
  }

  #[tokio::test]
  async fn transient_failures_are_retried() {
    let (url, calls) = spawn_upstream(Upstream::FlakyThen(2, sample_generated().to_string())).await;
    let oa = client_for(&url);
    let doc = oa.generate_curriculum(&Prompts::default(), &fast_settings(), &request(None)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(doc.learning_outcomes.len(), 1);
  }

  #[tokio::test]
  async fn persistent_failure_surfaces_upstream_error() {
    let (url, calls) = spawn_upstream(Upstream::Fail(500, "boom".into())).await;
    let oa = client_for(&url);
    let err = oa.generate_curriculum(&Prompts::default(), &fast_settings(), &request(None)).await.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match err {
      GenerationError::Upstream { status, message } => {
        assert_eq!(status, 500);
        assert_eq!(message, "boom");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn unparseable_output_is_not_retried() {
    let (url, calls) = spawn_upstream(Upstream::Content("I'd rather not.".into())).await;
    let oa = client_for(&url);
    let err = oa.generate_curriculum(&Prompts::default(), &fast_settings(), &request(None)).await.unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn empty_content_is_reported() {
    let (url, _calls) = spawn_upstream(Upstream::Content("  ".into())).await;
    let oa = client_for(&url);
    let err = oa.generate_curriculum(&Prompts::default(), &fast_settings(), &request(None)).await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
  }
}

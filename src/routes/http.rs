//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::{CurriculumDocument, CurriculumRequest};
use crate::error::ApiError;
use crate::export::JsonSink;
use crate::logic::*;
use crate::protocol::*;
use crate::seeds::create_empty_document;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, generation_enabled: state.generation_enabled() })
}

#[instrument(level = "info")]
pub async fn http_get_empty() -> impl IntoResponse {
  Json(create_empty_document())
}

#[instrument(level = "info", skip(body), fields(name_len = body.name.len(), weeks = body.duration_weeks))]
pub async fn http_post_validate(Json(body): Json<CurriculumRequest>) -> impl IntoResponse {
  let out = validate_request(&body);
  info!(target: "curriculum", valid = out.valid, failing = out.errors.len(), "HTTP validate");
  Json(out)
}

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmitOut>, ApiError> {
  let out = submit(&state, body.mode, &body.request).await?;
  info!(target: "curriculum", mode = ?body.mode, "HTTP submit dispatched");
  Ok(Json(out))
}

#[instrument(level = "info", skip(body), fields(name_len = body.name.len(), weeks = body.duration_weeks))]
pub async fn http_post_manual(Json(body): Json<CurriculumRequest>) -> Result<Json<ManualOut>, ApiError> {
  Ok(Json(manual_seed(&body)?))
}

#[instrument(level = "info", skip(state, body), fields(name_len = body.name.len(), weeks = body.duration_weeks))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CurriculumRequest>,
) -> Result<Json<GenerateOut>, ApiError> {
  let out = generate(&state, &body).await?;
  info!(target: "curriculum", weeks = out.document.weeks.len(), "HTTP generate served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(doc), fields(weeks = doc.weeks.len()))]
pub async fn http_post_review(Json(doc): Json<CurriculumDocument>) -> impl IntoResponse {
  let out = review_document(&doc);
  info!(target: "curriculum", issues = out.issues.len(), has_errors = out.has_errors, "HTTP review");
  Json(out)
}

#[instrument(level = "info", skip(doc), fields(code = %doc.identity.code))]
pub async fn http_post_export_json(Json(doc): Json<CurriculumDocument>) -> Result<impl IntoResponse, ApiError> {
  let out = export_with(&JsonSink, &doc)?;
  let disposition = format!("attachment; filename=\"{}\"", out.file_name);
  Ok((
    [
      (header::CONTENT_TYPE, out.content_type.to_string()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    out.bytes,
  ))
}

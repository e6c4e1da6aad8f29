//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - validating a request and routing it to the manual or generate consumer
//!   - building the manual editor seed
//!   - calling the model for a full curriculum
//!   - reviewing and exporting finished documents

use tracing::{info, instrument};

use crate::domain::{CurriculumDocument, CurriculumRequest};
use crate::error::ApiError;
use crate::export::{DocumentSink, Export};
use crate::openai::GenerationError;
use crate::protocol::{GenerateOut, ManualOut, ReviewOut, SubmitMode, SubmitOut, ValidateOut};
use crate::review::review;
use crate::state::AppState;
use crate::validate::{check, validate};

pub fn validate_request(req: &CurriculumRequest) -> ValidateOut {
  let errors = check(req);
  ValidateOut { valid: errors.is_empty(), errors }
}

/// Manual path: hand the request, untouched, to the editor together with a
/// document seeded from it.
#[instrument(level = "info", skip(req), fields(name = %req.name, weeks = req.duration_weeks))]
pub fn manual_seed(req: &CurriculumRequest) -> Result<ManualOut, ApiError> {
  let valid = validate(req)?;
  let document = CurriculumDocument::seeded_from(&valid);
  info!(target: "curriculum", weeks = document.weeks.len(), "Manual editor seeded");
  Ok(ManualOut { request: valid.into_inner(), document })
}

/// Generate path: validation first, then one (retrying) model call. Nothing
/// partial is returned on failure; the caller may resubmit the same request.
#[instrument(level = "info", skip(state, req), fields(name = %req.name, weeks = req.duration_weeks))]
pub async fn generate(state: &AppState, req: &CurriculumRequest) -> Result<GenerateOut, ApiError> {
  let valid = validate(req)?;
  let oa = state.openai.as_ref().ok_or(GenerationError::Disabled)?;
  let document = oa.generate_curriculum(&state.prompts, &state.generation, &valid).await?;
  Ok(GenerateOut { document })
}

pub async fn submit(state: &AppState, mode: SubmitMode, req: &CurriculumRequest) -> Result<SubmitOut, ApiError> {
  match mode {
    SubmitMode::Manual => manual_seed(req).map(SubmitOut::Manual),
    SubmitMode::Generate => generate(state, req).await.map(SubmitOut::Generate),
  }
}

pub fn review_document(doc: &CurriculumDocument) -> ReviewOut {
  let r = review(doc);
  ReviewOut { has_errors: r.has_errors(), issues: r.issues }
}

pub fn export_with(sink: &dyn DocumentSink, doc: &CurriculumDocument) -> Result<Export, ApiError> {
  Ok(sink.write(doc)?)
}

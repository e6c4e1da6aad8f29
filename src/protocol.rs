//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{CurriculumDocument, CurriculumRequest};
use crate::review::Issue;
use crate::validate::FieldErrors;

/// Which consumer a validated request goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
  /// Seed the manual editor; no model involved.
  Manual,
  /// Ask the model for a full curriculum.
  Generate,
}

#[derive(Debug, Deserialize)]
pub struct SubmitIn {
  pub mode: SubmitMode,
  pub request: CurriculumRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateOut {
  pub valid: bool,
  pub errors: FieldErrors,
}

/// Editor seed: the request exactly as submitted plus a document prefilled from it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ManualOut {
  pub request: CurriculumRequest,
  pub document: CurriculumDocument,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateOut {
  pub document: CurriculumDocument,
}

/// Either consumer's answer to a `submit`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubmitOut {
  Manual(ManualOut),
  Generate(GenerateOut),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewOut {
  pub has_errors: bool,
  pub issues: Vec<Issue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthOut {
  pub ok: bool,
  pub generation_enabled: bool,
}

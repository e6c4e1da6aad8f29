//! Request validation for the curriculum form.
//!
//! All checks run on every call and their failures accumulate, one message
//! per field. Validation never errors out; a failing request comes back as a
//! `FieldErrors` map the form can render inline.

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::domain::CurriculumRequest;

pub const MIN_WEEKS: i64 = 1;
pub const MAX_WEEKS: i64 = 24;

pub const NAME_REQUIRED: &str = "Curriculum name is required";
pub const DURATION_OUT_OF_RANGE: &str = "Duration must be between 1 and 24 weeks";
pub const DESCRIPTION_REQUIRED: &str = "Curriculum description is required";

/// Closed set of request fields an error can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  Name,
  DurationWeeks,
  Level,
  Description,
  AdditionalContext,
}

impl Field {
  pub fn as_str(self) -> &'static str {
    match self {
      Field::Name => "name",
      Field::DurationWeeks => "durationWeeks",
      Field::Level => "level",
      Field::Description => "description",
      Field::AdditionalContext => "additionalContext",
    }
  }

  /// Map a form input name (current or legacy spelling) to its field.
  pub fn from_input_name(name: &str) -> Option<Field> {
    match name {
      "name" | "nama" => Some(Field::Name),
      "durationWeeks" | "durasi" => Some(Field::DurationWeeks),
      "level" => Some(Field::Level),
      "description" | "deskripsi" => Some(Field::Description),
      "additionalContext" | "additional_context" => Some(Field::AdditionalContext),
      _ => None,
    }
  }
}

/// Per-field error messages. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, field: Field, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  /// Drop the stored error for a field, e.g. once the user edits it.
  /// Returns the message that was cleared.
  pub fn clear(&mut self, field: Field) -> Option<String> { self.0.remove(&field) }

  pub fn get(&self, field: Field) -> Option<&str> { self.0.get(&field).map(String::as_str) }
  pub fn contains(&self, field: Field) -> bool { self.0.contains_key(&field) }
  pub fn is_empty(&self) -> bool { self.0.is_empty() }
  pub fn len(&self) -> usize { self.0.len() }

  pub fn fields(&self) -> impl Iterator<Item = Field> + '_ { self.0.keys().copied() }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }
}

impl std::fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field.as_str(), msg)).collect();
    f.write_str(&parts.join("; "))
  }
}

/// A request that passed `validate`. Only `validate` constructs one, so
/// holders can rely on a non-blank name/description and an in-range duration.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidRequest(CurriculumRequest);

impl ValidRequest {
  /// Duration as an unsigned week count; always within 1..=24.
  pub fn weeks(&self) -> u32 { self.0.duration_weeks as u32 }

  /// Additional context with surrounding whitespace removed, if any remains.
  pub fn context(&self) -> Option<&str> {
    self.0.additional_context.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }

  pub fn into_inner(self) -> CurriculumRequest { self.0 }
}

impl Deref for ValidRequest {
  type Target = CurriculumRequest;
  fn deref(&self) -> &CurriculumRequest { &self.0 }
}

/// Check a request. Pure: the same record always yields the same result.
pub fn validate(req: &CurriculumRequest) -> Result<ValidRequest, FieldErrors> {
  let errors = check(req);
  if errors.is_empty() { Ok(ValidRequest(req.clone())) } else { Err(errors) }
}

/// All field errors for a request, empty when it is valid.
pub fn check(req: &CurriculumRequest) -> FieldErrors {
  let mut errors = FieldErrors::new();
  if req.name.trim().is_empty() {
    errors.insert(Field::Name, NAME_REQUIRED);
  }
  if !(MIN_WEEKS..=MAX_WEEKS).contains(&req.duration_weeks) {
    errors.insert(Field::DurationWeeks, DURATION_OUT_OF_RANGE);
  }
  if req.description.trim().is_empty() {
    errors.insert(Field::Description, DESCRIPTION_REQUIRED);
  }
  errors
}

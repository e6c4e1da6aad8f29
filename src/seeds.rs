//! Default content: the empty curriculum document and the editor seed built
//! from a validated request.

use crate::domain::{
  Certification, CurriculumDocument, Identity, TargetAudience, TeachingMethod, ToolsResources, Week,
  DEFAULT_DURATION_WEEKS, DEFAULT_TIME_ALLOCATION,
};
use crate::validate::ValidRequest;

/// Empty week `n` with the fixed placeholder time allocation.
pub fn placeholder_week(n: u32) -> Week {
  Week {
    week_number: n,
    theme: String::new(),
    outcome_codes: Vec::new(),
    core_topics: Vec::new(),
    teaching_method: TeachingMethod::default(),
    time_allocation: DEFAULT_TIME_ALLOCATION.to_string(),
    project: None,
    learning_experience: String::new(),
    assessment: None,
  }
}

/// Structurally complete, semantically empty curriculum.
///
/// Every call builds fresh vectors, so two documents never share a week list.
pub fn create_empty_document() -> CurriculumDocument {
  CurriculumDocument {
    id: None,
    created_at: None,
    updated_at: None,
    identity: Identity::default(),
    description: String::new(),
    tagline: String::new(),
    target_audience: TargetAudience::default(),
    learning_outcomes: Vec::new(),
    weeks: (1..=DEFAULT_DURATION_WEEKS).map(placeholder_week).collect(),
    assessment: Vec::new(),
    instructors: Vec::new(),
    tools_resources: ToolsResources::default(),
    certification: Certification::default(),
    references: Vec::new(),
    facilities: None,
    investment: None,
  }
}

impl CurriculumDocument {
  /// Starting point for the manual editor: the empty document carrying the
  /// request's name, level, description and duration.
  pub fn seeded_from(req: &ValidRequest) -> Self {
    let mut doc = create_empty_document();
    doc.identity.name = req.name.trim().to_string();
    doc.identity.level = req.level;
    doc.description = req.description.trim().to_string();
    doc.set_duration(req.weeks());
    doc
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CurriculumRequest, DeliveryMode, Level};
  use crate::validate::validate;

  #[test]
  fn empty_document_has_eight_numbered_weeks() {
    let doc = create_empty_document();
    assert_eq!(doc.weeks.len(), 8);
    let numbers: Vec<u32> = doc.weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(doc.weeks.iter().all(|w| w.time_allocation == "Lecture 2x120', Workshop 3x180'"));
    assert!(doc.weeks.iter().all(|w| w.theme.is_empty() && w.project.is_none() && w.assessment.is_none()));
  }

  #[test]
  fn empty_document_duration_matches_week_count() {
    let doc = create_empty_document();
    assert_eq!(doc.identity.duration_weeks, 8);
    assert_eq!(doc.identity.duration_weeks as usize, doc.weeks.len());
  }

  #[test]
  fn empty_document_identity_and_certification_defaults() {
    let doc = create_empty_document();
    assert_eq!(doc.identity.delivery_mode, DeliveryMode::Hybrid);
    assert_eq!(doc.identity.level, Level::Beginner);
    assert_eq!(doc.identity.capacity, 20);
    assert_eq!(doc.certification.min_passing_score, 70.0);
    assert!(doc.certification.graduation_requirements.is_empty());
    assert!(doc.learning_outcomes.is_empty());
    assert!(doc.assessment.is_empty());
    assert!(doc.instructors.is_empty());
    assert!(doc.references.is_empty());
    assert!(doc.tools_resources.software.is_empty());
    assert!(doc.tools_resources.hardware.is_none());
    assert_eq!(doc.assessment_weight_total(), 0.0);
  }

  #[test]
  fn empty_documents_are_independently_owned() {
    let a = create_empty_document();
    let mut b = create_empty_document();
    assert_eq!(a, b);

    b.weeks[0].theme = "Changed".into();
    b.weeks.push(placeholder_week(9));
    assert_eq!(a.weeks.len(), 8);
    assert!(a.weeks[0].theme.is_empty());
    assert_ne!(a, b);
  }

  #[test]
  fn default_impl_is_the_empty_document() {
    assert_eq!(CurriculumDocument::default(), create_empty_document());
  }

  #[test]
  fn seeded_document_follows_the_request() {
    let req = CurriculumRequest {
      name: "  Fullstack Bootcamp ".into(),
      duration_weeks: 10,
      level: Level::Intermediate,
      description: "Learn web dev".into(),
      additional_context: None,
    };
    let valid = validate(&req).unwrap();
    let doc = CurriculumDocument::seeded_from(&valid);
    assert_eq!(doc.identity.name, "Fullstack Bootcamp");
    assert_eq!(doc.identity.level, Level::Intermediate);
    assert_eq!(doc.identity.duration_weeks, 10);
    assert_eq!(doc.weeks.len(), 10);
    assert_eq!(doc.description, "Learn web dev");
  }
}

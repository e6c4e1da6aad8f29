//! Non-enforcing checks over a curriculum document.
//!
//! The record types accept anything structurally sound; the expectations
//! consumers have (unique outcome codes, weights summing to 100, minimum
//! narrative length, ...) are reported here as issues instead.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{CurriculumDocument, OutcomeCategory};

pub const WEIGHT_TOLERANCE: f64 = 0.5;
pub const MIN_METHOD_WORDS: usize = 20;
pub const MIN_ACTIVITY_WORDS: usize = 20;
pub const MIN_EXPERIENCE_WORDS: usize = 30;
pub const MIN_CRITERIA_WORDS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Warning,
  Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
  DuplicateOutcomeCode,
  UnknownOutcomeReference,
  WeekNumbering,
  AssessmentWeightTotal,
  WeeklyWeightTotal,
  TooFewWords,
  PassingScoreRange,
  CapacityZero,
  MissingOutcomeCategory,
}

impl IssueKind {
  pub fn severity(self) -> Severity {
    match self {
      IssueKind::DuplicateOutcomeCode
      | IssueKind::UnknownOutcomeReference
      | IssueKind::PassingScoreRange => Severity::Error,
      IssueKind::WeekNumbering
      | IssueKind::AssessmentWeightTotal
      | IssueKind::WeeklyWeightTotal
      | IssueKind::TooFewWords
      | IssueKind::CapacityZero
      | IssueKind::MissingOutcomeCategory => Severity::Warning,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
  pub severity: Severity,
  pub kind: IssueKind,
  /// JSON-pointer style location, e.g. `/weeks/2/outcomeCodes/0`.
  pub path: String,
  pub message: String,
}

impl Issue {
  fn new(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { severity: kind.severity(), kind, path: path.into(), message: message.into() }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub issues: Vec<Issue>,
}

impl Review {
  pub fn has_errors(&self) -> bool { self.issues.iter().any(|i| i.severity == Severity::Error) }
  pub fn is_clean(&self) -> bool { self.issues.is_empty() }

  pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> + '_ {
    self.issues.iter().filter(move |i| i.kind == kind)
  }
}

fn word_count(s: &str) -> usize { s.split_whitespace().count() }

fn weight_off(total: f64) -> bool { (total - 100.0).abs() > WEIGHT_TOLERANCE }

/// Inspect a document. Never mutates it and never fails.
#[instrument(level = "debug", skip(doc), fields(weeks = doc.weeks.len(), outcomes = doc.learning_outcomes.len()))]
pub fn review(doc: &CurriculumDocument) -> Review {
  let mut issues = Vec::new();

  outcomes(doc, &mut issues);
  weeks(doc, &mut issues);
  assessment(doc, &mut issues);

  let score = doc.certification.min_passing_score;
  if !(0.0..=100.0).contains(&score) {
    issues.push(Issue::new(
      IssueKind::PassingScoreRange,
      "/certification/minPassingScore",
      format!("Minimum passing score {score} is outside 0-100"),
    ));
  }
  if doc.identity.capacity == 0 {
    issues.push(Issue::new(IssueKind::CapacityZero, "/identity/capacity", "Capacity is 0"));
  }

  debug!(target: "curriculum", issues = issues.len(), "Document reviewed");
  Review { issues }
}

fn outcomes(doc: &CurriculumDocument, issues: &mut Vec<Issue>) {
  let mut first_seen: HashMap<&str, usize> = HashMap::new();
  for (i, lo) in doc.learning_outcomes.iter().enumerate() {
    if let Some(first) = first_seen.get(lo.code.as_str()) {
      issues.push(Issue::new(
        IssueKind::DuplicateOutcomeCode,
        format!("/learningOutcomes/{i}/code"),
        format!("Outcome code '{}' already used by outcome #{}", lo.code, first + 1),
      ));
    } else {
      first_seen.insert(lo.code.as_str(), i);
    }
  }

  if !doc.learning_outcomes.is_empty() {
    let covered: HashSet<OutcomeCategory> = doc.learning_outcomes.iter().map(|lo| lo.category).collect();
    for cat in OutcomeCategory::ALL {
      if !covered.contains(&cat) {
        issues.push(Issue::new(
          IssueKind::MissingOutcomeCategory,
          "/learningOutcomes",
          format!("No {cat} learning outcome"),
        ));
      }
    }
  }
}

fn weeks(doc: &CurriculumDocument, issues: &mut Vec<Issue>) {
  let expected = doc.identity.duration_weeks as usize;
  let in_order = doc.weeks.iter().enumerate().all(|(i, w)| w.week_number as usize == i + 1);
  if doc.weeks.len() != expected || !in_order {
    issues.push(Issue::new(
      IssueKind::WeekNumbering,
      "/weeks",
      format!(
        "Expected weeks 1..={} in order, found [{}]",
        expected,
        doc.weeks.iter().map(|w| w.week_number.to_string()).collect::<Vec<_>>().join(", ")
      ),
    ));
  }

  let mut weekly_total = 0.0;
  let mut has_weekly = false;

  for (i, w) in doc.weeks.iter().enumerate() {
    for (j, code) in w.outcome_codes.iter().enumerate() {
      if doc.outcome(code).is_none() {
        issues.push(Issue::new(
          IssueKind::UnknownOutcomeReference,
          format!("/weeks/{i}/outcomeCodes/{j}"),
          format!("Week {} references unknown outcome '{}'", w.week_number, code),
        ));
      }
    }

    let texts = [
      ("teachingMethod/description", &w.teaching_method.description, MIN_METHOD_WORDS),
      ("teachingMethod/activity", &w.teaching_method.activity, MIN_ACTIVITY_WORDS),
      ("learningExperience", &w.learning_experience, MIN_EXPERIENCE_WORDS),
    ];
    for (field, text, min) in texts {
      short_text(issues, format!("/weeks/{i}/{field}"), w.week_number, text, min);
    }

    if let Some(a) = &w.assessment {
      has_weekly = true;
      weekly_total += a.weight;
      short_text(issues, format!("/weeks/{i}/assessment/criteria"), w.week_number, &a.criteria, MIN_CRITERIA_WORDS);
    }
  }

  if has_weekly && weight_off(weekly_total) {
    issues.push(Issue::new(
      IssueKind::WeeklyWeightTotal,
      "/weeks",
      format!("Weekly assessment weights total {weekly_total}%, expected 100%"),
    ));
  }
}

fn short_text(issues: &mut Vec<Issue>, path: String, week: u32, text: &str, min: usize) {
  let words = word_count(text);
  // Blank text is an unfilled placeholder, not a short one.
  if words > 0 && words < min {
    issues.push(Issue::new(
      IssueKind::TooFewWords,
      path,
      format!("Week {week}: {words} words, at least {min} expected"),
    ));
  }
}

fn assessment(doc: &CurriculumDocument, issues: &mut Vec<Issue>) {
  if doc.assessment.is_empty() {
    return;
  }
  let total = doc.assessment_weight_total();
  if weight_off(total) {
    issues.push(Issue::new(
      IssueKind::AssessmentWeightTotal,
      "/assessment",
      format!("Assessment weights total {total}%, expected 100%"),
    ));
  }
}

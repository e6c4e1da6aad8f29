//! Domain models: the curriculum request collected by the form, the closed
//! enumerations it uses, and the full nested curriculum document.
//!
//! Wire names are camelCase English. Documents written by the older
//! Indonesian-keyed generator (`identitas`, `minggu`, `mingguKe`, ...) still
//! load through serde aliases.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Default bootcamp length. Drives both the identity duration and the number
/// of placeholder weeks in an empty document.
pub const DEFAULT_DURATION_WEEKS: u32 = 8;
pub const DEFAULT_CAPACITY: u32 = 20;
pub const DEFAULT_MIN_PASSING_SCORE: f64 = 70.0;
pub const DEFAULT_TIME_ALLOCATION: &str = "Lecture 2x120', Workshop 3x180'";

/// Out-of-set text for one of the closed enumerations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
  pub kind: &'static str,
  pub value: String,
  pub expected: &'static str,
}

/// Audience level of a bootcamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
  #[default]
  #[serde(alias = "beginner")]
  Beginner,
  #[serde(alias = "intermediate")]
  Intermediate,
  #[serde(alias = "advanced")]
  Advanced,
}

impl Level {
  pub fn as_str(self) -> &'static str {
    match self {
      Level::Beginner => "Beginner",
      Level::Intermediate => "Intermediate",
      Level::Advanced => "Advanced",
    }
  }

  /// One-line guidance handed to the model so depth matches the level.
  pub fn depth_hint(self) -> &'static str {
    match self {
      Level::Beginner => "fundamentals first, no prior professional experience assumed",
      Level::Intermediate => "applied practice on top of working fundamentals",
      Level::Advanced => "advanced topics, architecture and production concerns",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Level {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Ok(Level::Beginner),
      "intermediate" => Ok(Level::Intermediate),
      "advanced" => Ok(Level::Advanced),
      _ => Err(UnknownVariant {
        kind: "level",
        value: s.to_string(),
        expected: "Beginner, Intermediate, Advanced",
      }),
    }
  }
}

/// How the bootcamp is conducted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
  #[serde(alias = "online")]
  Online,
  #[serde(alias = "offline")]
  Offline,
  #[default]
  #[serde(alias = "hybrid")]
  Hybrid,
}

impl DeliveryMode {
  pub fn as_str(self) -> &'static str {
    match self {
      DeliveryMode::Online => "Online",
      DeliveryMode::Offline => "Offline",
      DeliveryMode::Hybrid => "Hybrid",
    }
  }

  pub fn describe(self) -> &'static str {
    match self {
      DeliveryMode::Online => "full remote",
      DeliveryMode::Offline => "full onsite",
      DeliveryMode::Hybrid => "a mix of remote and onsite sessions",
    }
  }
}

impl fmt::Display for DeliveryMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for DeliveryMode {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "online" => Ok(DeliveryMode::Online),
      "offline" => Ok(DeliveryMode::Offline),
      "hybrid" => Ok(DeliveryMode::Hybrid),
      _ => Err(UnknownVariant {
        kind: "delivery mode",
        value: s.to_string(),
        expected: "Online, Offline, Hybrid",
      }),
    }
  }
}

/// What kind of skill a learning outcome covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
  #[serde(alias = "technical")]
  Technical,
  #[serde(rename = "Soft Skill", alias = "SoftSkill", alias = "Soft-Skill", alias = "soft skill")]
  SoftSkill,
  #[serde(alias = "portfolio")]
  Portfolio,
}

impl OutcomeCategory {
  pub const ALL: [OutcomeCategory; 3] =
    [OutcomeCategory::Technical, OutcomeCategory::SoftSkill, OutcomeCategory::Portfolio];

  pub fn as_str(self) -> &'static str {
    match self {
      OutcomeCategory::Technical => "Technical",
      OutcomeCategory::SoftSkill => "Soft Skill",
      OutcomeCategory::Portfolio => "Portfolio",
    }
  }
}

impl fmt::Display for OutcomeCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OutcomeCategory {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let folded: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_ascii_lowercase();
    match folded.as_str() {
      "technical" => Ok(OutcomeCategory::Technical),
      "softskill" => Ok(OutcomeCategory::SoftSkill),
      "portfolio" => Ok(OutcomeCategory::Portfolio),
      _ => Err(UnknownVariant {
        kind: "outcome category",
        value: s.to_string(),
        expected: "Technical, Soft Skill, Portfolio",
      }),
    }
  }
}

// ---------------------------------------------------------------------------
// Curriculum request (form input)
// ---------------------------------------------------------------------------

/// Minimal record collected by the form. Missing text fields read as empty so
/// the validator, not the extractor, reports them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumRequest {
  #[serde(default, alias = "nama")]
  pub name: String,
  #[serde(default, alias = "durasi", deserialize_with = "lenient_weeks")]
  pub duration_weeks: i64,
  #[serde(default)]
  pub level: Level,
  #[serde(default, alias = "deskripsi")]
  pub description: String,
  #[serde(default, alias = "additional_context", skip_serializing_if = "Option::is_none")]
  pub additional_context: Option<String>,
}

impl Default for CurriculumRequest {
  fn default() -> Self {
    Self {
      name: String::new(),
      duration_weeks: DEFAULT_DURATION_WEEKS as i64,
      level: Level::Beginner,
      description: String::new(),
      additional_context: None,
    }
  }
}

/// Form inputs arrive as numbers or numeric strings. Anything that is not a
/// whole number becomes 0, which the range check then rejects.
fn lenient_weeks<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
  let v = serde_json::Value::deserialize(d)?;
  Ok(weeks_from_value(&v))
}

pub fn weeks_from_value(v: &serde_json::Value) -> i64 {
  use serde_json::Value;
  match v {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| {
        n.as_f64()
          .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
          .map(|f| f as i64)
      })
      .unwrap_or(0),
    Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
    _ => 0,
  }
}

// ---------------------------------------------------------------------------
// Curriculum document
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Identity {
  #[serde(alias = "nama")]
  pub name: String,
  #[serde(alias = "kode")]
  pub code: String,
  #[serde(alias = "durasi")]
  pub duration_weeks: u32,
  #[serde(alias = "tipe")]
  pub delivery_mode: DeliveryMode,
  pub level: Level,
  #[serde(alias = "kapasitas")]
  pub capacity: u32,
}

impl Default for Identity {
  fn default() -> Self {
    Self {
      name: String::new(),
      code: String::new(),
      duration_weeks: DEFAULT_DURATION_WEEKS,
      delivery_mode: DeliveryMode::Hybrid,
      level: Level::Beginner,
      capacity: DEFAULT_CAPACITY,
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetAudience {
  #[serde(alias = "deskripsi")]
  pub description: String,
  #[serde(alias = "latar_belakang")]
  pub backgrounds: Vec<String>,
  #[serde(alias = "prasyarat_teknis")]
  pub technical_prerequisites: Vec<String>,
  #[serde(alias = "prasyarat_soft_skill")]
  pub soft_skill_prerequisites: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningOutcome {
  #[serde(alias = "kode")]
  pub code: String,
  #[serde(alias = "pernyataan")]
  pub statement: String,
  #[serde(alias = "kategori")]
  pub category: OutcomeCategory,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeachingMethod {
  #[serde(alias = "metode")]
  pub method: String,
  #[serde(alias = "deskripsi")]
  pub description: String,
  #[serde(alias = "aktivitas")]
  pub activity: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
  #[serde(alias = "nama")]
  pub name: String,
  #[serde(alias = "deskripsi")]
  pub description: String,
  pub deliverables: Vec<String>,
  #[serde(alias = "teknologi")]
  pub technologies: Vec<String>,
}

/// Per-week assessment note.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyAssessment {
  #[serde(alias = "kriteria")]
  pub criteria: String,
  #[serde(alias = "bobot")]
  pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Week {
  #[serde(alias = "mingguKe")]
  pub week_number: u32,
  #[serde(alias = "tema")]
  pub theme: String,
  /// Codes of the learning outcomes this week works towards.
  #[serde(alias = "learningOutcomes")]
  pub outcome_codes: Vec<String>,
  #[serde(alias = "materiPokok")]
  pub core_topics: Vec<String>,
  #[serde(alias = "metodePembelajaran")]
  pub teaching_method: TeachingMethod,
  #[serde(alias = "waktu")]
  pub time_allocation: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project: Option<Project>,
  #[serde(alias = "pengalamanBelajar")]
  pub learning_experience: String,
  #[serde(alias = "penilaian", skip_serializing_if = "Option::is_none")]
  pub assessment: Option<WeeklyAssessment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssessmentComponent {
  #[serde(alias = "nama")]
  pub name: String,
  #[serde(alias = "deskripsi")]
  pub description: String,
  #[serde(alias = "bobot")]
  pub weight: f64,
  #[serde(alias = "metode")]
  pub method: String,
  #[serde(alias = "kriteria")]
  pub criteria: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instructor {
  #[serde(alias = "nama")]
  pub name: String,
  pub expertise: Vec<String>,
  #[serde(alias = "peran")]
  pub role: String,
  #[serde(alias = "kontak", skip_serializing_if = "Option::is_none")]
  pub contact: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsResources {
  pub software: Vec<String>,
  #[serde(alias = "platform")]
  pub platforms: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hardware: Option<Vec<String>>,
  #[serde(alias = "akun_diperlukan")]
  pub required_accounts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
  #[serde(alias = "nama")]
  pub name: String,
  #[serde(alias = "syarat_kelulusan")]
  pub graduation_requirements: Vec<String>,
  /// Minimum final score to pass, in percent.
  #[serde(alias = "nilai_minimal")]
  pub min_passing_score: f64,
  #[serde(alias = "benefit")]
  pub benefits: Vec<String>,
}

impl Default for Certification {
  fn default() -> Self {
    Self {
      name: String::new(),
      graduation_requirements: Vec::new(),
      min_passing_score: DEFAULT_MIN_PASSING_SCORE,
      benefits: Vec::new(),
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Investment {
  #[serde(alias = "biaya")]
  pub cost: f64,
  #[serde(alias = "early_bird", skip_serializing_if = "Option::is_none")]
  pub early_bird: Option<f64>,
  #[serde(alias = "cicilan", skip_serializing_if = "Option::is_none")]
  pub installment: Option<bool>,
  #[serde(alias = "beasiswa", skip_serializing_if = "Option::is_none")]
  pub scholarship: Option<bool>,
}

/// Full curriculum plan. Metadata stamps belong to whatever persists the
/// document; nothing in this crate sets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurriculumDocument {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<String>,

  #[serde(alias = "identitas")]
  pub identity: Identity,
  #[serde(alias = "deskripsi")]
  pub description: String,
  #[serde(alias = "deskripsiSingkat")]
  pub tagline: String,
  #[serde(alias = "targetPeserta")]
  pub target_audience: TargetAudience,
  pub learning_outcomes: Vec<LearningOutcome>,
  #[serde(alias = "minggu")]
  pub weeks: Vec<Week>,
  pub assessment: Vec<AssessmentComponent>,
  #[serde(alias = "instruktur")]
  pub instructors: Vec<Instructor>,
  pub tools_resources: ToolsResources,
  #[serde(alias = "sertifikasi")]
  pub certification: Certification,
  #[serde(alias = "referensi")]
  pub references: Vec<String>,
  #[serde(alias = "fasilitas", skip_serializing_if = "Option::is_none")]
  pub facilities: Option<Vec<String>>,
  #[serde(alias = "investasi", skip_serializing_if = "Option::is_none")]
  pub investment: Option<Investment>,
}

impl Default for CurriculumDocument {
  fn default() -> Self { crate::seeds::create_empty_document() }
}

impl CurriculumDocument {
  /// Change the duration and keep the weekly plan the same length.
  ///
  /// Weeks beyond the new length are dropped, missing ones are appended as
  /// placeholders, and every week is renumbered 1..=weeks in list order.
  pub fn set_duration(&mut self, weeks: u32) {
    self.identity.duration_weeks = weeks;
    let target = weeks as usize;
    self.weeks.truncate(target);
    while self.weeks.len() < target {
      let n = self.weeks.len() as u32 + 1;
      self.weeks.push(crate::seeds::placeholder_week(n));
    }
    for (i, w) in self.weeks.iter_mut().enumerate() {
      w.week_number = i as u32 + 1;
    }
  }

  pub fn outcome(&self, code: &str) -> Option<&LearningOutcome> {
    self.learning_outcomes.iter().find(|lo| lo.code == code)
  }

  /// Sum of assessment component weights, in percent.
  pub fn assessment_weight_total(&self) -> f64 {
    self.assessment.iter().map(|a| a.weight).sum()
  }
}

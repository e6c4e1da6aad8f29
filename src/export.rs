//! Export sinks for finished curricula.
//!
//! A sink turns a document into a downloadable artifact. JSON is produced
//! here; other formats (DOCX) are rendered by external services that accept
//! the same JSON document.

use tracing::{info, instrument};

use crate::domain::CurriculumDocument;
use crate::util::slugify;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("serialization failed: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// A rendered artifact ready to hand to the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
  pub file_name: String,
  pub content_type: &'static str,
  pub bytes: Vec<u8>,
}

pub trait DocumentSink {
  fn write(&self, doc: &CurriculumDocument) -> Result<Export, ExportError>;
}

/// Pretty-printed JSON in the document's wire format.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSink;

impl DocumentSink for JsonSink {
  #[instrument(level = "info", skip_all, fields(code = %doc.identity.code))]
  fn write(&self, doc: &CurriculumDocument) -> Result<Export, ExportError> {
    let bytes = serde_json::to_vec_pretty(doc)?;
    let file_name = format!("{}.json", file_stem(doc));
    info!(target: "curriculum", %file_name, bytes = bytes.len(), "JSON export written");
    Ok(Export { file_name, content_type: "application/json", bytes })
  }
}

/// File name stem from the curriculum code, else its name, else `curriculum`.
pub fn file_stem(doc: &CurriculumDocument) -> String {
  [&doc.identity.code, &doc.identity.name]
    .into_iter()
    .map(|s| slugify(s))
    .find(|s| !s.is_empty())
    .unwrap_or_else(|| "curriculum".to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::create_empty_document;

  #[test]
  fn json_export_round_trips() {
    let mut doc = create_empty_document();
    doc.identity.name = "Data Engineering".into();
    doc.references.push("Designing Data-Intensive Applications".into());

    let out = JsonSink.write(&doc).unwrap();
    assert_eq!(out.content_type, "application/json");
    let back: CurriculumDocument = serde_json::from_slice(&out.bytes).unwrap();
    assert_eq!(back, doc);
    // Pretty output, one field per line.
    assert!(String::from_utf8(out.bytes).unwrap().contains("\n  \"identity\": {"));
  }

  #[test]
  fn file_name_prefers_code_then_name() {
    let mut doc = create_empty_document();
    assert_eq!(JsonSink.write(&doc).unwrap().file_name, "curriculum.json");

    doc.identity.name = "Full Stack Web Development".into();
    assert_eq!(JsonSink.write(&doc).unwrap().file_name, "full-stack-web-development.json");

    doc.identity.code = "BOOT-001".into();
    assert_eq!(JsonSink.write(&doc).unwrap().file_name, "boot-001.json");

    doc.identity.code = "***".into();
    assert_eq!(file_stem(&doc), "full-stack-web-development");
  }
}

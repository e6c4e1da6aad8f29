//! Bootcamp curriculum service.
//!
//! - `validate`: checks the form's curriculum request, accumulating per-field errors
//! - `domain` / `seeds`: the curriculum document schema and its empty/default instance
//! - `openai`: generation of full curricula through OpenAI chat completions
//! - `review` / `export`: non-enforcing document checks and the JSON download
//! - `routes`: the axum HTTP surface used by the form

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod logic;
pub mod openai;
pub mod protocol;
pub mod review;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;
pub mod validate;

pub use domain::{CurriculumDocument, CurriculumRequest, DeliveryMode, Level, OutcomeCategory};
pub use seeds::create_empty_document;
pub use validate::{validate, Field, FieldErrors, ValidRequest};

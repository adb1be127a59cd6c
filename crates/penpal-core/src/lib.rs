//! Core of Penpal: everything between an inbound request body and the
//! provider's raw completion text.
//!
//! # Architecture
//!
//! - [`letter`] — request/response DTOs, including the [`letter::LetterOutcome`] sum type
//! - [`prompt`] — Prompt Builder: fixed instruction templates
//! - [`interpret`] — Response Interpreter: raw provider text → typed outcome
//! - [`types`] — OpenAI chat completions wire format
//! - [`config`] — schema, loading, and env var overrides
//! - [`error`] — error taxonomy shared by providers and the gateway

pub mod config;
pub mod error;
pub mod interpret;
pub mod letter;
pub mod prompt;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use letter::{
    AdditionalInfoRequest, LetterGenerationRequest, LetterOutcome, QaTurn, StyleAnalysisRequest,
    StyleSummary,
};
pub use prompt::PromptLanguage;

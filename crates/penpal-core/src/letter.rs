//! Request and response bodies of the letter endpoints.
//!
//! Every value here is built from one inbound body, consumed once, and dropped.

use serde::{Deserialize, Serialize};

/// Default sampling temperature when a resume request omits it.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Accepted sampling temperature range (inclusive).
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

// ─────────────────────────────────────────────
// Style analysis
// ─────────────────────────────────────────────

/// Writing samples to derive a style fingerprint from.
///
/// Three body shapes are accepted on the wire:
/// `{"text1", "text2", "text3"}`, `{"text"}`, or `{"samples": [...]}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StyleAnalysisRequest {
    /// One text per situation, as in the three-situation form.
    Situations {
        text1: String,
        text2: String,
        text3: String,
    },
    /// Any number of samples, in order.
    Samples { samples: Vec<String> },
    /// A single sample.
    Single { text: String },
}

impl StyleAnalysisRequest {
    /// The samples in the order the caller supplied them.
    pub fn samples(&self) -> Vec<&str> {
        match self {
            StyleAnalysisRequest::Situations {
                text1,
                text2,
                text3,
            } => vec![text1.as_str(), text2.as_str(), text3.as_str()],
            StyleAnalysisRequest::Samples { samples } => {
                samples.iter().map(String::as_str).collect()
            }
            StyleAnalysisRequest::Single { text } => vec![text.as_str()],
        }
    }

    /// Check that there is at least one sample and none is blank.
    pub fn validate(&self) -> Result<(), String> {
        let samples = self.samples();
        if samples.is_empty() {
            return Err("at least one text sample is required".to_string());
        }
        if let Some(pos) = samples.iter().position(|s| s.trim().is_empty()) {
            return Err(format!("text sample {} is empty", pos + 1));
        }
        Ok(())
    }
}

/// The provider's description of a writer's style.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleSummary {
    pub style_characteristics: String,
}

// ─────────────────────────────────────────────
// Letter generation
// ─────────────────────────────────────────────

/// First turn of the letter flow.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LetterGenerationRequest {
    /// Style summary, usually the output of `/analyze_style`.
    pub style_characteristics: String,
    /// Why the letter is being written.
    pub purpose: String,
    /// Relationship between writer and recipient.
    pub recipient: String,
    /// Episode or content the letter should include.
    pub episode: String,
}

/// One answered clarifying question.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaTurn {
    pub question: String,
    pub answer: String,
}

impl QaTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        QaTurn {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A follow-up turn after the model asked a clarifying question.
///
/// The server keeps no session: the caller replays the whole exchange on
/// every call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdditionalInfoRequest {
    /// Earlier answered questions, oldest first.
    #[serde(default)]
    pub history: Vec<QaTurn>,
    /// The question `new_answer` responds to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// The caller's answer to the most recent question.
    pub new_answer: String,
    /// Sampling temperature for this call.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// The first-turn request, so the final letter can still follow the style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<LetterGenerationRequest>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl AdditionalInfoRequest {
    /// A resume request answering `question` with no prior history.
    pub fn answering(question: impl Into<String>, answer: impl Into<String>) -> Self {
        AdditionalInfoRequest {
            history: Vec::new(),
            question: Some(question.into()),
            new_answer: answer.into(),
            temperature: DEFAULT_TEMPERATURE,
            letter: None,
        }
    }

    pub fn with_history(self, history: Vec<QaTurn>) -> Self {
        AdditionalInfoRequest { history, ..self }
    }

    pub fn with_letter(self, letter: LetterGenerationRequest) -> Self {
        AdditionalInfoRequest {
            letter: Some(letter),
            ..self
        }
    }

    pub fn with_temperature(self, temperature: f64) -> Self {
        AdditionalInfoRequest {
            temperature,
            ..self
        }
    }

    /// Check the sampling temperature.
    pub fn validate(&self) -> Result<(), String> {
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(format!(
                "temperature must be between {} and {}, got {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end(),
                self.temperature
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────

/// Result of one letter turn: a finished letter or one more question.
///
/// Serialized as `{"generated_letter": "..."}` or `{"additional_question": "..."}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LetterOutcome {
    GeneratedLetter(String),
    AdditionalQuestion(String),
}

impl LetterOutcome {
    /// Whether the caller has to answer a question before the letter is done.
    pub fn needs_more_input(&self) -> bool {
        matches!(self, LetterOutcome::AdditionalQuestion(_))
    }

    /// The question text, if the model asked one.
    pub fn question(&self) -> Option<&str> {
        match self {
            LetterOutcome::AdditionalQuestion(q) => Some(q),
            LetterOutcome::GeneratedLetter(_) => None,
        }
    }

    /// The letter text, if the model wrote one.
    pub fn letter(&self) -> Option<&str> {
        match self {
            LetterOutcome::GeneratedLetter(l) => Some(l),
            LetterOutcome::AdditionalQuestion(_) => None,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

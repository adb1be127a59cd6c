//! Response Interpreter — classify the provider's completion text.
//!
//! The model is told to answer with a single JSON object. Classification
//! happens once, here; callers only ever see a [`LetterOutcome`] or an
//! [`Error`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::letter::LetterOutcome;

/// Key the model uses when it needs one more piece of information.
pub const QUESTION_KEY: &str = "additional_question";
/// Key the model uses for a finished letter.
pub const LETTER_KEY: &str = "generated_letter";
/// Key the model uses for a style summary.
pub const STYLE_KEY: &str = "style";

/// Classify a letter-turn completion.
///
/// Keys are checked in a fixed order and the first hit wins: the question
/// key before the letter key. Text that is not JSON is rejected outright,
/// without attempting to salvage a JSON fragment from it.
pub fn interpret_letter_response(raw: &str) -> Result<LetterOutcome> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        warn!(error = %e, len = raw.len(), "completion is not valid JSON");
        Error::MalformedResponse
    })?;

    let Some(object) = value.as_object() else {
        warn!("completion is JSON but not an object");
        return Err(Error::UnexpectedShape);
    };

    if let Some(question) = object.get(QUESTION_KEY) {
        let text = question.as_str().ok_or(Error::UnexpectedShape)?;
        debug!(len = text.len(), "model asked a clarifying question");
        return Ok(LetterOutcome::AdditionalQuestion(text.to_string()));
    }

    if let Some(letter) = object.get(LETTER_KEY) {
        let text = letter.as_str().ok_or(Error::UnexpectedShape)?;
        debug!(len = text.len(), "model produced a letter");
        return Ok(LetterOutcome::GeneratedLetter(text.to_string()));
    }

    warn!(
        keys = ?object.keys().collect::<Vec<_>>(),
        "completion has no recognized key"
    );
    Err(Error::UnexpectedShape)
}

/// Extract the style summary from a style-analysis completion.
///
/// The summary is opaque text: if the completion is `{"style": "..."}` the
/// inner string is returned, anything else is passed through unchanged.
pub fn interpret_style_response(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => match object.get(STYLE_KEY).and_then(Value::as_str) {
            Some(style) => style.to_string(),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

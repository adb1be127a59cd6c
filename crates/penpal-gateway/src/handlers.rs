//! Endpoint handlers.
//!
//! Each handler is one stateless turn: bind the body, build the prompt, make
//! one provider call, interpret the reply. A letter conversation is driven
//! by the caller replaying its history into `/complete_letter`.

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info};

use penpal_core::interpret::{interpret_letter_response, interpret_style_response};
use penpal_core::prompt::{build_letter_prompt, build_resume_prompt, build_style_analysis_prompt};
use penpal_core::{
    AdditionalInfoRequest, LetterGenerationRequest, LetterOutcome, StyleAnalysisRequest,
    StyleSummary,
};

use crate::error::ApiError;
use crate::extract::Json;
use crate::state::AppState;

/// `POST /analyze_style`
pub async fn analyze_style(
    State(state): State<AppState>,
    Json(request): Json<StyleAnalysisRequest>,
) -> Result<Json<StyleSummary>, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    let samples = request.samples();
    debug!(samples = samples.len(), "analyzing style");
    let prompt = build_style_analysis_prompt(&samples, state.settings.language);

    let raw = state
        .provider
        .complete(&prompt, &state.request_config())
        .await?;

    Ok(Json(StyleSummary {
        style_characteristics: interpret_style_response(&raw),
    }))
}

/// `POST /generate_letter`
pub async fn generate_letter(
    State(state): State<AppState>,
    Json(request): Json<LetterGenerationRequest>,
) -> Result<(StatusCode, Json<LetterOutcome>), ApiError> {
    debug!(
        purpose_len = request.purpose.len(),
        episode_len = request.episode.len(),
        "generating letter"
    );
    let prompt = build_letter_prompt(&request, state.settings.language);

    let raw = state
        .provider
        .complete(&prompt, &state.request_config())
        .await?;

    Ok(letter_response(interpret_letter_response(&raw)?))
}

/// `POST /complete_letter`
pub async fn complete_letter(
    State(state): State<AppState>,
    Json(request): Json<AdditionalInfoRequest>,
) -> Result<(StatusCode, Json<LetterOutcome>), ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    debug!(
        history = request.history.len(),
        temperature = request.temperature,
        "resuming letter"
    );
    let prompt = build_resume_prompt(&request, state.settings.language);
    let config = state.request_config().with_temperature(request.temperature);

    let raw = state.provider.complete(&prompt, &config).await?;

    Ok(letter_response(interpret_letter_response(&raw)?))
}

/// `GET /test`
pub async fn ping() -> Json<Value> {
    Json(json!({ "response": "ok" }))
}

/// 201 while the model still has a question, 200 once the letter is written.
fn letter_response(outcome: LetterOutcome) -> (StatusCode, Json<LetterOutcome>) {
    if outcome.needs_more_input() {
        info!("model asked a follow-up question");
        (StatusCode::CREATED, Json(outcome))
    } else {
        info!("letter generated");
        (StatusCode::OK, Json(outcome))
    }
}

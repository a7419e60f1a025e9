use crate::dtos::{GenerateRequest, GenerateResponse};
use crate::services::prompts::SYSTEM_PROMPT;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use metrics::counter;
use serde_json::Value;
use service_core::error::AppError;

pub const INVALID_BODY_MESSAGE: &str = "❌ Cuerpo JSON inválido";
pub const GENERATION_FAILED_MESSAGE: &str = "❌ Error al generar frases";

/// Forward the user's text to the provider and return its content as-is.
pub async fn generate_phrases(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = match payload {
        Ok(Json(body)) => GenerateRequest::from_body(body),
        // Non-JSON bodies carry no fields, so they fail as missing input below.
        Err(JsonRejection::MissingJsonContentType(_)) => GenerateRequest::default(),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected malformed request body");
            return Err(AppError::InvalidBody {
                message: INVALID_BODY_MESSAGE.to_string(),
                details: rejection.body_text(),
            });
        }
    };

    let user_input = request.into_user_input().map_err(|e| {
        tracing::warn!(error = %e, "Rejected generation request");
        e
    })?;

    match state
        .text_provider
        .generate(SYSTEM_PROMPT, &user_input)
        .await
    {
        Ok(content) => {
            counter!("phrase_generation_total", "outcome" => "success").increment(1);
            tracing::info!(
                model = %state.text_provider.model(),
                input_len = user_input.len(),
                "Phrases generated"
            );
            Ok(Json(GenerateResponse { result: content }))
        }
        Err(e) => {
            counter!("phrase_generation_total", "outcome" => "failure").increment(1);
            tracing::error!(
                error = %e,
                model = %state.text_provider.model(),
                "Phrase generation failed"
            );
            Err(AppError::Upstream {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                details: e.to_string(),
            })
        }
    }
}

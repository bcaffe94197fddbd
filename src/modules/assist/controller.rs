use axum::{Json, extract::State};
use quizhub_core::{AppError, ErrorResponse};
use quizhub_models::{AssistResponse, FeedbackRequest, HintRequest};
use tracing::instrument;

use super::service::AssistService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Generate a hint for a question
#[utoipa::path(
    post,
    path = "/api/assist/hint",
    request_body = HintRequest,
    responses(
        (status = 200, description = "Generated hint", body = AssistResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 503, description = "Hint service not configured or unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assist"
)]
#[instrument(skip_all)]
pub async fn generate_hint(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<HintRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    let response = AssistService::generate(state.hints.as_ref(), "hint", &dto.prompt()).await?;
    Ok(Json(response))
}

/// Generate feedback on a student's answer
#[utoipa::path(
    post,
    path = "/api/assist/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Generated feedback", body = AssistResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 503, description = "Hint service not configured or unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Assist"
)]
#[instrument(skip_all)]
pub async fn generate_feedback(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<FeedbackRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    let response =
        AssistService::generate(state.hints.as_ref(), "feedback", &dto.prompt()).await?;
    Ok(Json(response))
}

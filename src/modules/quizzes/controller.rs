use axum::{Json, extract::State, http::StatusCode};
use quizhub_core::{AppError, ErrorResponse};
use quizhub_models::{
    Attempt, AttemptResult, CreateQuizDto, PaginatedQuizzesResponse, QuizFilterParams, QuizView,
    SubmitAttemptDto, UpdateQuizDto,
};
use tracing::instrument;

use super::service::{QuizService, Viewer};
use crate::extract::ResourceId;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireStudent, RequireTeacher};
use crate::state::AppState;
use crate::validator::{AppQuery, ValidatedJson};

/// List quizzes visible to the caller
///
/// Students and teachers see published quizzes plus their own drafts.
/// Admins and moderators see everything.
#[utoipa::path(
    get,
    path = "/api/quizzes",
    params(
        ("subject" = Option<String>, Query, description = "Filter by subject"),
        ("search" = Option<String>, Query, description = "Match on title or description"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "1-indexed page")
    ),
    responses(
        (status = 200, description = "Page of quizzes", body = PaginatedQuizzesResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip_all)]
pub async fn get_quizzes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppQuery(filters): AppQuery<QuizFilterParams>,
) -> Result<Json<PaginatedQuizzesResponse>, AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    Ok(Json(QuizService::get_quizzes(&state.db, viewer, filters).await?))
}

/// Create a quiz
#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizDto,
    responses(
        (status = 201, description = "Quiz created", body = QuizView),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a teacher or admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip_all)]
pub async fn create_quiz(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    ValidatedJson(dto): ValidatedJson<CreateQuizDto>,
) -> Result<(StatusCode, Json<QuizView>), AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    let quiz = QuizService::create_quiz(&state.db, viewer, dto).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Get a quiz. The answer key is omitted for students.
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz", body = QuizView),
        (status = 404, description = "Malformed, unknown or hidden ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_quiz(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<QuizView>, AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    Ok(Json(QuizService::get_quiz(&state.db, viewer, id).await?))
}

/// Update a quiz (owner or admin)
#[utoipa::path(
    put,
    path = "/api/quizzes/{id}",
    params(("id" = String, Path, description = "Quiz ID")),
    request_body = UpdateQuizDto,
    responses(
        (status = 200, description = "Updated quiz", body = QuizView),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Malformed or unknown ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_quiz(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
    ValidatedJson(dto): ValidatedJson<UpdateQuizDto>,
) -> Result<Json<QuizView>, AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    Ok(Json(QuizService::update_quiz(&state.db, viewer, id, dto).await?))
}

/// Delete a quiz and its attempts (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Malformed or unknown ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    QuizService::delete_quiz(&state.db, viewer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit answers to a published quiz
///
/// Answers are positional; `null` marks a skipped question. Scoring happens
/// here, and the quiz owner is notified.
#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/attempts",
    params(("id" = String, Path, description = "Quiz ID")),
    request_body = SubmitAttemptDto,
    responses(
        (status = 201, description = "Attempt scored", body = AttemptResult),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a student", body = ErrorResponse),
        (status = 404, description = "Malformed, unknown or unpublished quiz", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn submit_attempt(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    ResourceId(id): ResourceId,
    ValidatedJson(dto): ValidatedJson<SubmitAttemptDto>,
) -> Result<(StatusCode, Json<AttemptResult>), AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    let result = QuizService::submit_attempt(&state.db, viewer, id, dto).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// List attempts on a quiz (owner or admin)
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}/attempts",
    params(("id" = String, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Attempts, newest first", body = Vec<Attempt>),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Malformed or unknown ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Quizzes"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attempts(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<Vec<Attempt>>, AppError> {
    let viewer = Viewer::from_auth(&auth_user)?;
    Ok(Json(QuizService::get_attempts(&state.db, viewer, id).await?))
}

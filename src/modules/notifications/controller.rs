use axum::{Json, extract::State, http::StatusCode};
use quizhub_core::{AppError, ErrorResponse};
use quizhub_models::{
    CreateNotificationDto, Notification, NotificationFilterParams, PaginatedNotificationsResponse,
};
use tracing::instrument;

use super::service::NotificationService;
use crate::extract::ResourceId;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireSender;
use crate::state::AppState;
use crate::validator::{AppQuery, ValidatedJson};

/// The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("unread" = Option<String>, Query, description = "Only unread when true"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "1-indexed page")
    ),
    responses(
        (status = 200, description = "Page of notifications", body = PaginatedNotificationsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip_all)]
pub async fn get_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppQuery(filters): AppQuery<NotificationFilterParams>,
) -> Result<Json<PaginatedNotificationsResponse>, AppError> {
    let page =
        NotificationService::get_notifications(&state.db, auth_user.user_id()?, filters).await?;
    Ok(Json(page))
}

/// Send a notification to a user
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationDto,
    responses(
        (status = 201, description = "Notification sent", body = Notification),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a teacher, admin or moderator", body = ErrorResponse),
        (status = 404, description = "Recipient not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip_all)]
pub async fn create_notification(
    State(state): State<AppState>,
    _sender: RequireSender,
    ValidatedJson(dto): ValidatedJson<CreateNotificationDto>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let notification = NotificationService::create_notification(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// Mark a notification read (recipient only)
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Updated notification", body = Notification),
        (status = 404, description = "Malformed, unknown or foreign ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth_user))]
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<Notification>, AppError> {
    let notification = NotificationService::mark_read(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(notification))
}

/// Delete a notification (recipient or admin)
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Malformed, unknown or foreign ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_notification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    NotificationService::delete_notification(
        &state.db,
        auth_user.user_id()?,
        auth_user.is_admin(),
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use quizhub_core::{ErrorResponse, PaginationMeta, Role};
use quizhub_guard::{ProtectedView, RedirectTargets, ViewRoute};
use quizhub_models::{
    AssistResponse, Attempt, AttemptResult, AuthResponse, CreateNotificationDto, CreateQuizDto,
    CreateUserDto, FeedbackRequest, HintRequest, LoginRequest, Notification, NotificationKind,
    PaginatedNotificationsResponse, PaginatedQuizzesResponse, PaginatedUsersResponse, Question,
    QuestionView, QuizView, RegisterRequest, SubmitAttemptDto, UpdateQuizDto, UpdateUserDto, User,
};

use crate::modules::health::HealthResponse;
use crate::modules::views::ViewTable;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health_check,
        crate::modules::views::get_views,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::quizzes::controller::get_quizzes,
        crate::modules::quizzes::controller::create_quiz,
        crate::modules::quizzes::controller::get_quiz,
        crate::modules::quizzes::controller::update_quiz,
        crate::modules::quizzes::controller::delete_quiz,
        crate::modules::quizzes::controller::submit_attempt,
        crate::modules::quizzes::controller::get_attempts,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::create_notification,
        crate::modules::notifications::controller::mark_read,
        crate::modules::notifications::controller::delete_notification,
        crate::modules::assist::controller::generate_hint,
        crate::modules::assist::controller::generate_feedback,
    ),
    components(
        schemas(
            Role,
            User,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CreateUserDto,
            UpdateUserDto,
            PaginatedUsersResponse,
            Question,
            QuestionView,
            QuizView,
            CreateQuizDto,
            UpdateQuizDto,
            PaginatedQuizzesResponse,
            SubmitAttemptDto,
            Attempt,
            AttemptResult,
            Notification,
            NotificationKind,
            CreateNotificationDto,
            PaginatedNotificationsResponse,
            HintRequest,
            FeedbackRequest,
            AssistResponse,
            ViewTable,
            ViewRoute,
            ProtectedView,
            RedirectTargets,
            HealthResponse,
            ErrorResponse,
            PaginationMeta,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Views", description = "Client route-guard table"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Profiles and user management"),
        (name = "Quizzes", description = "Quizzes and attempts"),
        (name = "Notifications", description = "Per-user notifications"),
        (name = "Assist", description = "Generated hints and feedback")
    ),
    info(
        title = "Quizhub API",
        version = "0.1.0",
        description = "Quiz and feedback platform API built with Rust, Axum, and PostgreSQL, with JWT authentication and role-gated routes.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

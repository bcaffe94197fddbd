use anyhow::anyhow;
use axum::http::{HeaderValue, Method, Uri};
use axum::{Router, middleware};
use quizhub_core::AppError;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_auth;
use crate::middleware::error::report_errors;
use crate::middleware::rate_limit::{ip_rate_limiter, rate_limit};
use crate::modules::assist::router::init_assist_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::init_health_router;
use crate::modules::notifications::router::init_notifications_router;
use crate::modules::quizzes::router::init_quizzes_router;
use crate::modules::users::router::init_users_router;
use crate::modules::views::init_views_router;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(anyhow!("Not Found - {}", uri.path()))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let authenticated = middleware::from_fn_with_state(state.clone(), require_auth);
    let limits = &state.rate_limit_config;

    let mut auth_router = init_auth_router();
    if limits.enabled {
        auth_router = auth_router.route_layer(middleware::from_fn_with_state(
            ip_rate_limiter(limits.auth_quota()),
            rate_limit,
        ));
    }

    let api = Router::new()
        .nest("/auth", auth_router)
        .nest("/views", init_views_router())
        .nest("/users", init_users_router().route_layer(authenticated.clone()))
        .nest("/quizzes", init_quizzes_router().route_layer(authenticated.clone()))
        .nest(
            "/notifications",
            init_notifications_router().route_layer(authenticated.clone()),
        )
        .nest("/assist", init_assist_router().route_layer(authenticated));

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state.clone());

    if limits.enabled {
        router = router.layer(middleware::from_fn_with_state(
            ip_rate_limiter(limits.general_quota()),
            rate_limit,
        ));
    }

    router
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state, report_errors))
}

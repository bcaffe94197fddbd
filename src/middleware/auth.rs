use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use quizhub_auth::{Claims, bearer_token, verify_token};
use quizhub_core::{AppError, Role};
use serde_json::json;
use uuid::Uuid;

use crate::state::AppState;

pub const NOT_AUTHORIZED: &str = "Not authorized";

/// The verified principal. Inserted by [`require_auth`], read by handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id()
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_admin(&self) -> bool {
        self.0.has_role(Role::Admin)
    }
}

fn not_authorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": NOT_AUTHORIZED })),
    )
        .into_response()
}

/// Token check for protected routes.
///
/// A missing or blank `Authorization` header is answered here with
/// `{"message":"Not authorized"}`. A present header must carry a valid,
/// unexpired token; decoding failures go to the error classifier.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    // Non-ASCII bytes stay in the value so the token fails to decode
    // instead of reading as an absent header.
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_string())
        .filter(|value| !value.is_empty());

    let Some(header_value) = header_value else {
        return not_authorized();
    };

    match verify_token(bearer_token(&header_value), &state.jwt_config) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser(claims));
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(not_authorized)
    }
}

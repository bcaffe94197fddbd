//! Server-side role gates.
//!
//! The role always comes from the verified [`AuthUser`] principal, never
//! from anything the client sends alongside it. Two forms are offered:
//!
//! 1. [`require_roles`] and [`require_admin`], for whole routers:
//!    `.route_layer(middleware::from_fn(require_admin))`
//! 2. Extractors such as [`RequireTeacher`], for single handlers on routes
//!    shared with other roles
//!
//! Both answer 403 "Forbidden" on a mismatch and the handler never runs.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use quizhub_core::{AppError, Role};

use crate::metrics::track_authorization_check;
use crate::middleware::auth::AuthUser;

pub const FORBIDDEN: &str = "Forbidden";

/// Checks the principal against `allowed`.
pub fn authorize(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    let permitted = user.0.has_any_role(allowed);
    track_authorization_check(permitted, user.role().as_str());
    if permitted {
        Ok(())
    } else {
        tracing::debug!(role = %user.role(), ?allowed, "Role not permitted");
        Err(AppError::forbidden(anyhow!(FORBIDDEN)))
    }
}

pub async fn require_roles(req: Request, next: Next, allowed: &[Role]) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match AuthUser::from_request_parts(&mut parts, &()).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    if let Err(err) = authorize(&user, allowed) {
        return err.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Admin]).await
}

/// Declares an extractor that yields the [`AuthUser`] only when its role is
/// one of the listed ones.
macro_rules! require_role {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl $name {
            pub const ROLES: &'static [Role] = &[$($role),+];
        }

        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = Response;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                authorize(&user, Self::ROLES).map_err(IntoResponse::into_response)?;
                Ok($name(user))
            }
        }
    };
}

require_role!(RequireTeacher, [Role::Teacher, Role::Admin]);
require_role!(RequireStudent, [Role::Student]);
require_role!(RequireSender, [Role::Teacher, Role::Admin, Role::Moderator]);

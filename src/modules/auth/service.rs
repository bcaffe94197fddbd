use anyhow::{Context, anyhow};
use quizhub_auth::create_access_token;
use quizhub_config::JwtConfig;
use quizhub_core::{AppError, hash_password, verify_password};
use quizhub_models::{AuthResponse, LoginRequest, RegisterRequest, User, UserCredentials};
use sqlx::PgPool;

use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let role = dto.requested_role();
        if !role.is_self_registrable() {
            return Err(AppError::bad_request(anyhow!(
                "Role must be teacher or student"
            )));
        }

        let password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, role, created_at, updated_at",
        )
        .bind(dto.name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&password)
        .bind(role)
        .fetch_one(db)
        .await
        .context("Failed to insert user")?;

        track_user_registered(role.as_str());

        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        track_jwt_issued();

        Ok(AuthResponse { access_token, user })
    }

    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password, role, created_at, updated_at
             FROM users
             WHERE email = $1",
        )
        .bind(dto.email.trim().to_lowercase())
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        }

        let user = User::from(credentials);
        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        track_user_login_success(user.role.as_str());
        track_jwt_issued();

        Ok(AuthResponse { access_token, user })
    }
}

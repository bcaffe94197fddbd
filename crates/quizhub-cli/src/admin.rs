//! Administrator bootstrap.
//!
//! Admins cannot sign up through the API, so the first one is created here.

use anyhow::{Context, bail};
use quizhub_core::{Role, hash_password};
use sqlx::PgPool;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// Checks the interactive inputs before touching the database.
pub fn validate_admin_input(name: &str, email: &str, password: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        bail!("Name is required");
    }
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => bail!("Please provide a valid email"),
    }
    if password.len() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
    }
    Ok(())
}

pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    validate_admin_input(name, email, password)?;

    let hashed = hash_password(password).map_err(|e| e.error)?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name.trim())
    .bind(email.trim().to_lowercase())
    .bind(&hashed)
    .bind(Role::Admin)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match id {
        Some(id) => Ok(id),
        None => bail!("User with this email already exists"),
    }
}

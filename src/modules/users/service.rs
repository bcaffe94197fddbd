use anyhow::{Context, anyhow};
use quizhub_core::{AppError, hash_password};
use quizhub_models::{CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams};
use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::track_user_registered;

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s))
}

pub struct UserService;

impl UserService {
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)",
        )
        .bind(filters.role)
        .bind(&search)
        .fetch_one(db)
        .await
        .context("Failed to count users")?;

        let data = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(filters.role)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")?;

        Ok(PaginatedUsersResponse {
            data,
            meta: filters.pagination.meta(total),
        })
    }

    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&password)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .context("Failed to insert user")?;

        track_user_registered(user.role.as_str());
        Ok(user)
    }

    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow!("No fields to update")));
        }

        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 role = COALESCE($4, role),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email.map(|e| e.trim().to_lowercase()))
        .bind(dto.role)
        .fetch_optional(db)
        .await
        .context("Failed to update user")?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    pub async fn delete_user(db: &PgPool, id: Uuid, acting_user: Uuid) -> Result<(), AppError> {
        if id == acting_user {
            return Err(AppError::bad_request(anyhow!(
                "You cannot delete your own account"
            )));
        }

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }
}

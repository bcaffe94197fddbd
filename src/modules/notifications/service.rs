use anyhow::{Context, anyhow};
use quizhub_core::AppError;
use quizhub_models::{
    CreateNotificationDto, Notification, NotificationFilterParams, PaginatedNotificationsResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::track_notification_sent;

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, kind, read, created_at";

pub struct NotificationService;

impl NotificationService {
    pub async fn get_notifications(
        db: &PgPool,
        user_id: Uuid,
        filters: NotificationFilterParams,
    ) -> Result<PaginatedNotificationsResponse, AppError> {
        let unread_only = filters.unread_only();
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR NOT read)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(db)
        .await
        .context("Failed to count notifications")?;

        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("Failed to count unread notifications")?;

        let data = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = $1 AND (NOT $2 OR NOT read)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch notifications")?;

        Ok(PaginatedNotificationsResponse {
            data,
            meta: filters.pagination.meta(total),
            unread,
        })
    }

    pub async fn create_notification(
        db: &PgPool,
        dto: CreateNotificationDto,
    ) -> Result<Notification, AppError> {
        let recipient_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(dto.user_id)
                .fetch_one(db)
                .await
                .context("Failed to look up recipient")?;

        if !recipient_exists {
            return Err(AppError::not_found(anyhow!("Recipient not found")));
        }

        let notification = sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (user_id, message, kind)
             VALUES ($1, $2, $3)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(dto.user_id)
        .bind(dto.message.trim())
        .bind(dto.kind)
        .fetch_one(db)
        .await
        .context("Failed to insert notification")?;

        track_notification_sent(notification.kind.as_str());
        Ok(notification)
    }

    /// Marks one of the caller's notifications read. Someone else's
    /// notification is reported as missing.
    pub async fn mark_read(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET read = TRUE
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to mark notification read")?
        .ok_or_else(|| AppError::not_found(anyhow!("Notification not found")))
    }

    /// Recipients delete their own notifications; admins delete any.
    pub async fn delete_notification(
        db: &PgPool,
        user_id: Uuid,
        is_admin: bool,
        id: Uuid,
    ) -> Result<(), AppError> {
        let deleted =
            sqlx::query("DELETE FROM notifications WHERE id = $1 AND ($2 OR user_id = $3)")
                .bind(id)
                .bind(is_admin)
                .bind(user_id)
                .execute(db)
                .await
                .context("Failed to delete notification")?
                .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(anyhow!("Notification not found")));
        }
        Ok(())
    }
}

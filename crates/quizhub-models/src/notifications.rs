//! Per-user notifications.

use chrono::{DateTime, Utc};
use quizhub_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    General,
    QuizPublished,
    QuizSubmitted,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationKind::General => "general",
            NotificationKind::QuizPublished => "quiz_published",
            NotificationKind::QuizSubmitted => "quiz_submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationDto {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 1000, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NotificationFilterParams {
    /// Only unread notifications when `"true"`
    pub unread: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl NotificationFilterParams {
    pub fn unread_only(&self) -> bool {
        self.unread
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedNotificationsResponse {
    pub data: Vec<Notification>,
    pub meta: PaginationMeta,
    pub unread: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_general() {
        let dto: CreateNotificationDto = serde_json::from_str(&format!(
            r#"{{"user_id":"{}","message":"hello"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(dto.kind, NotificationKind::General);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn kind_uses_snake_case() {
        let json = serde_json::to_string(&NotificationKind::QuizSubmitted).unwrap();
        assert_eq!(json, r#""quiz_submitted""#);
    }

    #[test]
    fn empty_message_is_rejected() {
        let dto = CreateNotificationDto {
            user_id: Uuid::new_v4(),
            message: String::new(),
            kind: NotificationKind::General,
        };
        assert!(dto.validate().unwrap_err().field_errors().contains_key("message"));
    }

    #[test]
    fn unread_filter_flag() {
        let mut params = NotificationFilterParams::default();
        assert!(!params.unread_only());
        params.unread = Some("TRUE".into());
        assert!(params.unread_only());
        params.unread = Some("no".into());
        assert!(!params.unread_only());
    }
}

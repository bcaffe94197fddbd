use axum::{
    Router,
    routing::{delete, get, patch},
};

use super::controller::{create_notification, delete_notification, get_notifications, mark_read};
use crate::state::AppState;

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications).post(create_notification))
        .route("/{id}/read", patch(mark_read))
        .route("/{id}", delete(delete_notification))
}

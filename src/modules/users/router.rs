use axum::{Router, middleware, routing::get};

use super::controller::{create_user, delete_user, get_me, get_user, get_users, update_user};
use crate::middleware::role::require_admin;
use crate::state::AppState;

/// `/me` is open to every signed-in user; the rest is admin-only.
pub fn init_users_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn(require_admin));

    Router::new().route("/me", get(get_me)).merge(admin)
}

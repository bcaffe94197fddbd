use axum::{Router, routing::post};

use super::controller::{generate_feedback, generate_hint};
use crate::state::AppState;

pub fn init_assist_router() -> Router<AppState> {
    Router::new()
        .route("/hint", post(generate_hint))
        .route("/feedback", post(generate_feedback))
}

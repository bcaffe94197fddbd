use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_quiz, delete_quiz, get_attempts, get_quiz, get_quizzes, submit_attempt, update_quiz,
};
use crate::state::AppState;

/// Role checks live on the handlers since reads and writes share paths.
pub fn init_quizzes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_quizzes).post(create_quiz))
        .route("/{id}", get(get_quiz).put(update_quiz).delete(delete_quiz))
        .route("/{id}/attempts", post(submit_attempt).get(get_attempts))
}

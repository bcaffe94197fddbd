//! Feature modules. Each has a `controller` (HTTP handlers), a `service`
//! (queries and rules) and a `router`.

pub mod assist;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod quizzes;
pub mod users;
pub mod views;

//! # Quizhub Models
//!
//! Domain models and DTOs for the Quizhub API.
//!
//! # Modules
//!
//! - [`users`]: accounts, registration and login payloads
//! - [`quizzes`]: quizzes, questions, attempts and scoring
//! - [`notifications`]: per-user notifications
//! - [`assist`]: hint and feedback requests for the inference service
//!
//! # Example
//!
//! ```ignore
//! use quizhub_models::quizzes::{Question, score_attempt};
//!
//! let (score, total) = score_attempt(&questions, &answers);
//! ```

pub mod assist;
pub mod notifications;
pub mod quizzes;
pub mod users;

pub use assist::{AssistResponse, FeedbackRequest, HintRequest};
pub use notifications::{
    CreateNotificationDto, Notification, NotificationFilterParams, NotificationKind,
    PaginatedNotificationsResponse,
};
pub use quizzes::{
    Attempt, AttemptResult, CreateQuizDto, PaginatedQuizzesResponse, Question, QuestionView,
    Quiz, QuizFilterParams, QuizView, SubmitAttemptDto, UpdateQuizDto, score_attempt,
};
pub use users::{
    AuthResponse, CreateUserDto, LoginRequest, PaginatedUsersResponse, RegisterRequest,
    UpdateUserDto, User, UserCredentials, UserFilterParams,
};

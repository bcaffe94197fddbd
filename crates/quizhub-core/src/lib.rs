//! # Quizhub Core
//!
//! Core types, errors, and utilities for the Quizhub API.
//!
//! - [`errors`]: the application error type and the classifier that turns any
//!   failure into a status code and a JSON envelope
//! - [`roles`]: the fixed role registry (admin, teacher, student, moderator)
//! - [`pagination`]: pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use quizhub_core::errors::AppError;
//! use quizhub_core::roles::Role;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Quiz not found"));
//! assert_eq!(Role::parse("user"), Some(Role::Student));
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod roles;

// Re-export commonly used types at crate root
pub use errors::{AppError, DuplicateKey, ErrorReport, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use roles::Role;

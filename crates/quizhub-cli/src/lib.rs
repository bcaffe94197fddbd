//! # Quizhub CLI
//!
//! Administrative and maintenance tasks that run outside the API server.
//!
//! - [`admin`]: bootstrap administrator accounts
//! - [`dedupe`]: remove duplicate notifications
//! - [`seeder`]: fill a development database with fake users and quizzes
//!
//! ```ignore
//! use quizhub_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod dedupe;
pub mod seeder;

//! Request middleware and extractors.
//!
//! - [`auth`]: token check and the [`AuthUser`](auth::AuthUser) principal
//! - [`role`]: role gates, as middleware and as extractors
//! - [`error`]: terminal error reporting
//! - [`rate_limit`]: per-IP request limits
//!
//! Layer order, outermost first:
//!
//! ```text
//! report_errors -> logging -> metrics -> CORS -> rate_limit -> require_auth -> role gate -> handler
//! ```

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod role;

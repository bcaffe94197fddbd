//! # Quizhub Auth
//!
//! Verified access tokens for the Quizhub API.
//!
//! - [`claims`]: the principal carried by every access token
//! - [`jwt`]: HS256 token creation and verification
//!
//! The role inside [`Claims`] is the only role the server trusts. Role
//! strings a client keeps in local storage are routing hints for the UI.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{bearer_token, create_access_token, verify_token};

//! # Quizhub Config
//!
//! Configuration types for the Quizhub API, each loaded from environment
//! variables with development-friendly defaults:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: per-IP request limits
//! - [`server`]: bind address, metrics port and runtime environment
//! - [`inference`]: the hosted text-generation API used for hints
//!
//! ```ignore
//! use quizhub_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod inference;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use inference::InferenceConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{Environment, ServerConfig};

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

//! Rate limiting configuration.
//!
//! Limits are keyed by client IP. Authentication endpoints get a stricter
//! bucket than the rest of the API to slow down credential stuffing.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: `false` or `0` disables limiting (default enabled)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: default 10
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: default 50
//! - `RATE_LIMIT_AUTH_PER_SECOND`: default 1
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: default 5

use std::num::NonZeroU32;

use governor::Quota;

use crate::env_parse;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub general_per_second: u32,
    pub general_burst_size: u32,
    pub auth_per_second: u32,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 10,
            general_burst_size: 50,
            auth_per_second: 1,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
                .unwrap_or(defaults.enabled),
            general_per_second: env_parse("RATE_LIMIT_GENERAL_PER_SECOND")
                .unwrap_or(defaults.general_per_second),
            general_burst_size: env_parse("RATE_LIMIT_GENERAL_BURST_SIZE")
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: env_parse("RATE_LIMIT_AUTH_PER_SECOND")
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: env_parse("RATE_LIMIT_AUTH_BURST_SIZE")
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    /// Disabled limits, for tests driving the router without a peer address.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn general_quota(&self) -> Quota {
        quota(self.general_per_second, self.general_burst_size)
    }

    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        quota(self.auth_per_second, self.auth_burst_size)
    }
}

// Zero values are bumped to 1 so a misconfigured env var cannot build an empty quota.
fn quota(per_second: u32, burst: u32) -> Quota {
    let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rate).allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.general_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn disabled_keeps_limits() {
        let config = RateLimitConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.general_burst_size, 50);
    }

    #[test]
    fn zero_values_still_build_a_quota() {
        let config = RateLimitConfig {
            enabled: true,
            general_per_second: 0,
            general_burst_size: 0,
            auth_per_second: 0,
            auth_burst_size: 0,
        };
        assert_eq!(config.general_quota().burst_size().get(), 1);
        assert_eq!(config.auth_quota().burst_size().get(), 1);
    }

    #[test]
    fn auth_quota_uses_auth_burst() {
        let config = RateLimitConfig::default();
        assert_eq!(config.auth_quota().burst_size().get(), 5);
        assert_eq!(config.general_quota().burst_size().get(), 50);
    }
}

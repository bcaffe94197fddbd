//! The role registry.
//!
//! Roles form a fixed, closed set. The registry is compiled in, read-only,
//! and shared by the server-side role checks and the client route guard.
//! Unknown role strings never match anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    #[serde(alias = "user")]
    Student,
    Moderator,
}

/// Symbolic name to role tag. "USER" is the legacy name for students.
pub const ROLES: [(&str, Role); 5] = [
    ("ADMIN", Role::Admin),
    ("TEACHER", Role::Teacher),
    ("STUDENT", Role::Student),
    ("USER", Role::Student),
    ("MODERATOR", Role::Moderator),
];

/// Resolves a symbolic registry name such as `"TEACHER"`.
pub fn lookup(name: &str) -> Option<Role> {
    ROLES
        .iter()
        .find(|(symbol, _)| *symbol == name)
        .map(|(_, role)| *role)
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Moderator];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Moderator => "moderator",
        }
    }

    /// Parses a role tag, case-insensitively. Returns `None` for anything
    /// outside the registry.
    pub fn parse(tag: &str) -> Option<Role> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("user") {
            return Some(Role::Student);
        }
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(tag))
    }

    /// Roles that may sign up through the public registration endpoint.
    pub const fn is_self_registrable(self) -> bool {
        matches!(self, Role::Teacher | Role::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

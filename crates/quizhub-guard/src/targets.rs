use quizhub_core::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// Fixed routes the guard redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RedirectTargets {
    pub login: String,
    pub admin_home: String,
    pub teacher_home: String,
    pub student_home: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            admin_home: "/admin/dashboard".to_string(),
            teacher_home: "/teacher/dashboard".to_string(),
            student_home: "/student/dashboard".to_string(),
        }
    }
}

impl RedirectTargets {
    /// Landing route for a role. Roles without a dashboard, and unknown
    /// roles, go to login.
    pub fn home_for(&self, role: Option<Role>) -> &str {
        match role {
            Some(Role::Admin) => &self.admin_home,
            Some(Role::Teacher) => &self.teacher_home,
            Some(Role::Student) => &self.student_home,
            Some(Role::Moderator) | None => &self.login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homes() {
        let t = RedirectTargets::default();
        assert_eq!(t.home_for(Some(Role::Teacher)), "/teacher/dashboard");
        assert_eq!(t.home_for(Some(Role::Student)), "/student/dashboard");
        assert_eq!(t.home_for(Some(Role::Admin)), "/admin/dashboard");
        assert_eq!(t.home_for(Some(Role::Moderator)), "/login");
        assert_eq!(t.home_for(None), "/login");
    }
}

use quizhub_core::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// Access requirements of one protected view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProtectedView {
    /// `None` admits any signed-in user.
    pub allowed_roles: Option<Vec<Role>>,
    /// Refuse the view while an admin is impersonating another role.
    pub block_special: bool,
}

impl ProtectedView {
    pub fn any_signed_in() -> Self {
        Self::default()
    }

    pub fn for_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: Some(roles.into_iter().collect()),
            block_special: false,
        }
    }

    pub fn blocking_impersonation(mut self) -> Self {
        self.block_special = true;
        self
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles
            .as_ref()
            .is_some_and(|roles| roles.contains(&role))
    }
}

/// A client route and the view guarding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ViewRoute {
    #[schema(value_type = String)]
    pub path: &'static str,
    #[serde(flatten)]
    pub view: ProtectedView,
}

/// The protected routes of the single-page app.
pub fn protected_views() -> Vec<ViewRoute> {
    use Role::*;

    let route = |path, view| ViewRoute { path, view };
    vec![
        route("/admin/dashboard", ProtectedView::for_roles([Admin])),
        route(
            "/admin/users",
            ProtectedView::for_roles([Admin]).blocking_impersonation(),
        ),
        route("/teacher/dashboard", ProtectedView::for_roles([Teacher])),
        route("/teacher/quizzes/new", ProtectedView::for_roles([Teacher])),
        route(
            "/teacher/quizzes/:id/attempts",
            ProtectedView::for_roles([Teacher, Admin]),
        ),
        route("/student/dashboard", ProtectedView::for_roles([Student])),
        route("/student/quizzes/:id", ProtectedView::for_roles([Student])),
        route(
            "/moderation",
            ProtectedView::for_roles([Moderator, Admin]).blocking_impersonation(),
        ),
        route("/notifications", ProtectedView::any_signed_in()),
        route("/profile", ProtectedView::any_signed_in()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_only_listed_roles() {
        let view = ProtectedView::for_roles([Role::Teacher, Role::Admin]);
        assert!(view.allows(Role::Teacher));
        assert!(view.allows(Role::Admin));
        assert!(!view.allows(Role::Student));
        assert!(!ProtectedView::any_signed_in().allows(Role::Admin));
    }

    #[test]
    fn table_paths_are_unique() {
        let views = protected_views();
        let mut paths: Vec<_> = views.iter().map(|v| v.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), views.len());
    }

    #[test]
    fn route_serializes_flat() {
        let route = ViewRoute {
            path: "/admin/users",
            view: ProtectedView::for_roles([Role::Admin]).blocking_impersonation(),
        };
        let json = serde_json::to_value(route).unwrap();
        assert_eq!(json["path"], "/admin/users");
        assert_eq!(json["allowed_roles"], serde_json::json!(["admin"]));
        assert_eq!(json["block_special"], true);
    }
}

use quizhub_core::Role;

use crate::state::ClientState;
use crate::targets::RedirectTargets;
use crate::view::ProtectedView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Mount the protected view.
    Render,
    /// Navigate to the given route instead.
    Redirect(String),
    /// Show the "not available while viewing as another role" panel with a
    /// go-back action.
    Blocked,
}

/// Decides what to do with a navigation into `view`.
///
/// Rules, first match wins:
/// 1. no credential at all: redirect to login
/// 2. admin credential: blocked when impersonating a view that refuses it,
///    render when impersonating or when the view admits admins, otherwise
///    redirect to the admin home
/// 3. user credential: redirect to the role's home when the view lists
///    roles and the current one is not among them, otherwise render
pub fn guard(
    view: &ProtectedView,
    state: &ClientState,
    targets: &RedirectTargets,
) -> GuardDecision {
    if !state.has_admin_token && !state.has_user_token {
        return GuardDecision::Redirect(targets.login.clone());
    }

    if state.has_admin_token {
        if state.impersonation_target.is_some() {
            return if view.block_special {
                GuardDecision::Blocked
            } else {
                GuardDecision::Render
            };
        }
        if view.allows(Role::Admin) {
            return GuardDecision::Render;
        }
        return GuardDecision::Redirect(targets.admin_home.clone());
    }

    if view.allowed_roles.is_some() {
        let role = state.current_role.as_deref().and_then(Role::parse);
        if !role.is_some_and(|r| view.allows(r)) {
            return GuardDecision::Redirect(targets.home_for(role).to_string());
        }
    }

    GuardDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(view: &ProtectedView, state: &ClientState) -> GuardDecision {
        guard(view, state, &RedirectTargets::default())
    }

    fn redirect(to: &str) -> GuardDecision {
        GuardDecision::Redirect(to.to_string())
    }

    #[test]
    fn no_credentials_always_go_to_login() {
        let anon = ClientState::anonymous();
        for view in [
            ProtectedView::any_signed_in(),
            ProtectedView::for_roles([Role::Admin]),
            ProtectedView::for_roles([Role::Student]).blocking_impersonation(),
            ProtectedView::for_roles([]),
        ] {
            assert_eq!(decide(&view, &anon), redirect("/login"));
        }
    }

    #[test]
    fn stale_role_without_token_goes_to_login() {
        let state = ClientState {
            current_role: Some("teacher".into()),
            impersonation_target: Some("student".into()),
            ..ClientState::default()
        };
        assert_eq!(
            decide(&ProtectedView::for_roles([Role::Teacher]), &state),
            redirect("/login")
        );
    }

    #[test]
    fn impersonating_admin_is_blocked_from_special_views() {
        let view = ProtectedView::for_roles([Role::Teacher]).blocking_impersonation();
        let state = ClientState::admin(Some("teacher"));
        assert_eq!(decide(&view, &state), GuardDecision::Blocked);
    }

    #[test]
    fn impersonation_overrides_allowed_roles() {
        let view = ProtectedView::for_roles([Role::Teacher]);
        let state = ClientState::admin(Some("student"));
        assert_eq!(decide(&view, &state), GuardDecision::Render);
    }

    #[test]
    fn blocking_wins_even_when_admin_is_allowed() {
        let view = ProtectedView::for_roles([Role::Admin]).blocking_impersonation();
        assert_eq!(
            decide(&view, &ClientState::admin(Some("student"))),
            GuardDecision::Blocked
        );
        assert_eq!(decide(&view, &ClientState::admin(None)), GuardDecision::Render);
    }

    #[test]
    fn admin_renders_admin_views() {
        let view = ProtectedView::for_roles([Role::Admin, Role::Teacher]);
        assert_eq!(decide(&view, &ClientState::admin(None)), GuardDecision::Render);
    }

    #[test]
    fn admin_is_sent_home_from_other_views() {
        let state = ClientState::admin(None);
        assert_eq!(
            decide(&ProtectedView::for_roles([Role::Student]), &state),
            redirect("/admin/dashboard")
        );
        assert_eq!(
            decide(&ProtectedView::any_signed_in(), &state),
            redirect("/admin/dashboard")
        );
    }

    #[test]
    fn admin_credential_takes_precedence_over_user_credential() {
        let state = ClientState {
            has_admin_token: true,
            has_user_token: true,
            current_role: Some("student".into()),
            impersonation_target: None,
        };
        assert_eq!(
            decide(&ProtectedView::for_roles([Role::Student]), &state),
            redirect("/admin/dashboard")
        );
    }

    #[test]
    fn student_on_teacher_view_goes_to_student_home() {
        let view = ProtectedView::for_roles([Role::Teacher]);
        assert_eq!(
            decide(&view, &ClientState::user(Some("student"))),
            redirect("/student/dashboard")
        );
    }

    #[test]
    fn teacher_on_student_view_goes_to_teacher_home() {
        let view = ProtectedView::for_roles([Role::Student]);
        assert_eq!(
            decide(&view, &ClientState::user(Some("teacher"))),
            redirect("/teacher/dashboard")
        );
    }

    #[test]
    fn unknown_or_missing_role_goes_to_login() {
        let view = ProtectedView::for_roles([Role::Teacher]);
        assert_eq!(decide(&view, &ClientState::user(Some("wizard"))), redirect("/login"));
        assert_eq!(decide(&view, &ClientState::user(None)), redirect("/login"));
        assert_eq!(decide(&view, &ClientState::user(Some("moderator"))), redirect("/login"));
    }

    #[test]
    fn matching_role_renders() {
        let view = ProtectedView::for_roles([Role::Student, Role::Teacher]);
        assert_eq!(decide(&view, &ClientState::user(Some("Teacher"))), GuardDecision::Render);
        assert_eq!(decide(&view, &ClientState::user(Some("user"))), GuardDecision::Render);
    }

    #[test]
    fn views_without_roles_render_for_any_user() {
        let view = ProtectedView::any_signed_in();
        assert_eq!(decide(&view, &ClientState::user(Some("wizard"))), GuardDecision::Render);
        assert_eq!(decide(&view, &ClientState::user(None)), GuardDecision::Render);
    }

    #[test]
    fn user_impersonation_flag_is_ignored() {
        let mut state = ClientState::user(Some("student"));
        state.impersonation_target = Some("teacher".into());
        let view = ProtectedView::for_roles([Role::Teacher]).blocking_impersonation();
        assert_eq!(decide(&view, &state), redirect("/student/dashboard"));
    }

    #[test]
    fn custom_targets_are_used() {
        let targets = RedirectTargets {
            login: "/signin".into(),
            ..RedirectTargets::default()
        };
        assert_eq!(
            guard(&ProtectedView::any_signed_in(), &ClientState::anonymous(), &targets),
            redirect("/signin")
        );
    }

    #[test]
    fn deciding_twice_gives_the_same_answer() {
        let view = ProtectedView::for_roles([Role::Teacher]);
        let state = ClientState::user(Some("student"));
        assert_eq!(decide(&view, &state), decide(&view, &state));
    }

    #[test]
    fn every_table_entry_admits_its_listed_roles() {
        for route in crate::view::protected_views() {
            for role in route.view.allowed_roles.clone().unwrap_or_default() {
                let state = ClientState::user(Some(role.as_str()));
                assert_eq!(decide(&route.view, &state), GuardDecision::Render, "{}", route.path);
            }
        }
    }
}

//! # Quizhub Guard
//!
//! The decision the single-page app makes before mounting a protected view:
//! render it, redirect somewhere else, or show a blocking panel.
//!
//! [`guard`] is a pure function over a [`ProtectedView`] descriptor and the
//! [`ClientState`] read from local storage. It performs no I/O and mutates
//! nothing. Everything in `ClientState` is client-controlled, so a decision
//! is a routing hint only; the API re-checks the verified token's role on
//! every request.
//!
//! # Example
//!
//! ```ignore
//! use quizhub_guard::{ClientState, GuardDecision, ProtectedView, RedirectTargets, guard};
//! use quizhub_core::Role;
//!
//! let view = ProtectedView::for_roles([Role::Teacher]);
//! let state = ClientState::user(Some("student"));
//! let decision = guard(&view, &state, &RedirectTargets::default());
//! assert_eq!(decision, GuardDecision::Redirect("/student/dashboard".into()));
//! ```

pub mod decision;
pub mod state;
pub mod targets;
pub mod view;

pub use decision::{GuardDecision, guard};
pub use state::{ClientState, ClientStorage, storage_keys};
pub use targets::RedirectTargets;
pub use view::{ProtectedView, ViewRoute, protected_views};

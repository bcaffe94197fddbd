//! Serves the client route-guard table so the SPA and the server agree on
//! which roles may open which views.

use axum::{Json, Router, routing::get};
use quizhub_guard::{RedirectTargets, ViewRoute, protected_views};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewTable {
    pub targets: RedirectTargets,
    pub views: Vec<ViewRoute>,
}

/// Protected views and redirect targets for the client guard
#[utoipa::path(
    get,
    path = "/api/views",
    responses((status = 200, description = "Guard table", body = ViewTable)),
    tag = "Views"
)]
pub async fn get_views() -> Json<ViewTable> {
    Json(ViewTable {
        targets: RedirectTargets::default(),
        views: protected_views(),
    })
}

pub fn init_views_router() -> Router<AppState> {
    Router::new().route("/", get(get_views))
}

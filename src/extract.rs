use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use quizhub_core::AppError;
use uuid::Uuid;

/// The `{id}` segment of a resource route.
///
/// A value that is not a UUID cannot name any resource; the parse error is
/// passed to the classifier, which answers 404 "Resource not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;

        Uuid::parse_str(&raw)
            .map(ResourceId)
            .map_err(AppError::unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/things/{id}",
            get(|ResourceId(id): ResourceId| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn parses_uuid() {
        let id = Uuid::new_v4();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/things/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_id_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/things/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

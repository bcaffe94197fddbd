use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use quizhub_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `validator` rules.
///
/// Field-rule failures are handed to the error classifier untouched, which
/// answers 400 with every field message joined by ", ". Bodies that do not
/// parse are answered 400 here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let text = rejection.body_text();
    if let Some(field) = text
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(anyhow!("{} is required", field));
    }
    if text.contains("unknown variant") {
        return AppError::bad_request(anyhow!("Invalid value in request"));
    }
    if text.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate().map_err(AppError::unclassified)?;

        Ok(ValidatedJson(value))
    }
}

/// Query string that deserialized cleanly.
///
/// Bad values such as `?limit=abc` become a classified 400 instead of the
/// framework's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "query string rejected");
                AppError::bad_request(anyhow!("Invalid query parameters"))
            })?;

        Ok(AppQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Please provide a valid email"))]
        email: String,
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn extract(req: Request) -> Result<ValidatedJson<Signup>, AppError> {
        ValidatedJson::<Signup>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let ValidatedJson(signup) =
            extract(json_request(r#"{"email":"a@example.com","password":"secret1"}"#))
                .await
                .unwrap();
        assert_eq!(signup.email, "a@example.com");
    }

    #[tokio::test]
    async fn rule_failures_are_joined_in_field_order() {
        let err = extract(json_request(r#"{"email":"nope","password":"1"}"#))
            .await
            .unwrap_err();
        let classified = err.classify();
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            classified.message,
            "Please provide a valid email, Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn missing_field_is_named() {
        let err = extract(json_request(r#"{"email":"a@example.com"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.classify().message, "password is required");
    }

    #[tokio::test]
    async fn missing_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let classified = extract(req).await.unwrap_err().classify();
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        assert!(classified.message.contains("Content-Type"));
    }

    #[derive(Debug, Deserialize)]
    struct Listing {
        limit: Option<i64>,
    }

    async fn extract_query(uri: &str) -> Result<AppQuery<Listing>, AppError> {
        let (mut parts, _) = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
            .into_parts();
        AppQuery::<Listing>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn query_values_parse() {
        let AppQuery(listing) = extract_query("/?limit=5").await.unwrap();
        assert_eq!(listing.limit, Some(5));
    }

    #[tokio::test]
    async fn bad_query_value_is_a_classified_bad_request() {
        let classified = extract_query("/?limit=abc").await.unwrap_err().classify();
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        assert_eq!(classified.message, "Invalid query parameters");
    }
}

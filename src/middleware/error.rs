//! Terminal error reporting.
//!
//! [`AppError`](quizhub_core::AppError) leaves an [`ErrorReport`] in the
//! response extensions. This layer, the outermost one, logs each report
//! exactly once together with the request it came from, and outside
//! production rewrites the body to include the stack.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use quizhub_core::{ErrorReport, ErrorResponse};

use crate::metrics::{route_label, track_api_error};
use crate::state::AppState;

/// Best-effort client address: the socket peer, then the first
/// `X-Forwarded-For` hop.
pub fn client_ip(connect_info: Option<&ConnectInfo<SocketAddr>>, headers: &HeaderMap) -> String {
    if let Some(ConnectInfo(addr)) = connect_info {
        return addr.ip().to_string();
    }

    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn report_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = route_label(&req);
    let ip = client_ip(
        req.extensions().get::<ConnectInfo<SocketAddr>>(),
        req.headers(),
    );

    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    tracing::error!(
        message = %report.message,
        stack = %report.stack,
        status = report.status.as_u16(),
        path = %path,
        method = %method,
        ip = %ip,
        "Request failed"
    );
    track_api_error(report.status.as_u16(), &route);

    if state.server_config.environment.is_production() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = ErrorResponse::new(report.message).with_stack(report.stack);
    let (_, body) = Json(body).into_response().into_parts();
    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn peer_address_wins() {
        let addr: SocketAddr = "10.0.0.7:4242".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        assert_eq!(client_ip(Some(&ConnectInfo(addr)), &headers), "10.0.0.7");
    }

    #[test]
    fn forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(None, &headers), "203.0.113.9");
    }

    #[test]
    fn unknown_without_any_source() {
        assert_eq!(client_ip(None, &HeaderMap::new()), "unknown");
    }
}

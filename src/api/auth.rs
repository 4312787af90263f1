use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bearer-token authentication middleware for the `/api` routes.
///
/// If `API_TOKEN` is set, every request must carry
/// `Authorization: Bearer <token>` matching that value. If `API_TOKEN`
/// is empty / unset, authentication is disabled (dev mode).
pub async fn require_auth(req: Request, next: Next) -> Response {
    let expected = std::env::var("API_TOKEN").unwrap_or_default();
    if expected.is_empty() {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => next.run(req).await,
        Some(_) => (StatusCode::UNAUTHORIZED, "Invalid token").into_response(),
        None => {
            (StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header").into_response()
        }
    }
}

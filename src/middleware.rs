use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::error::ApiError;

/// How incoming requests are authenticated; fixed for the process lifetime
#[derive(Clone)]
pub enum AuthMode {
    /// Non-production: every request passes, with a warning
    Permissive,
    /// Production: a bearer token must be present and verified
    Strict(Arc<dyn TokenVerifier>),
}

/// Token carried in `Authorization: <scheme> <token>`
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Auth gate applied ahead of every route
pub async fn auth_gate(
    State(mode): State<AuthMode>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let verifier = match &mode {
        AuthMode::Permissive => {
            tracing::warn!(path = %path, "No JWT validation outside production");
            return next.run(request).await;
        }
        AuthMode::Strict(verifier) => verifier,
    };

    let Some(token) = bearer_token(&request) else {
        tracing::debug!(path = %path, "Missing bearer token");
        return ApiError::MissingToken.into_response();
    };

    let verified = verifier.verify(&token).await;
    match verified {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            tracing::warn!(path = %path, "Invalid token");
            ApiError::InvalidToken.into_response()
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Token verification failed");
            ApiError::AuthFailure(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use crate::test_utils::StaticVerifier;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(mode: AuthMode) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(mode, auth_gate))
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method("GET").uri("/ping");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn error_of(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorResponse>(body).unwrap().error
    }

    #[tokio::test]
    async fn test_permissive_passes_without_token() {
        let (status, body) = call(app(AuthMode::Permissive), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn test_strict_rejects_missing_token() {
        let mode = AuthMode::Strict(Arc::new(StaticVerifier::Accept));

        let (status, body) = call(app(mode.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(&body), "No token provided");

        // Scheme with no token segment
        let (status, _) = call(app(mode), Some("Bearer")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_strict_accepts_verified_token() {
        let mode = AuthMode::Strict(Arc::new(StaticVerifier::Accept));
        let (status, body) = call(app(mode), Some("Bearer good-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn test_strict_rejects_invalid_token() {
        let mode = AuthMode::Strict(Arc::new(StaticVerifier::Reject));
        let (status, body) = call(app(mode), Some("Bearer bad-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(&body), "Invalid token");
    }

    #[tokio::test]
    async fn test_verifier_failure_is_server_error() {
        let mode = AuthMode::Strict(Arc::new(StaticVerifier::Fail));
        let (status, body) = call(app(mode), Some("Bearer any")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_of(&body), "Failed to authenticate token");
    }
}

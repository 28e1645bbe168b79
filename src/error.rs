use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Every failure a handler or the auth gate can produce is one of these
/// variants; `IntoResponse` turns it into a status code and a JSON
/// `{"error": ...}` body. Server errors carry their cause for logging only,
/// it never reaches the client.
#[derive(Debug)]
pub enum ApiError {
    /// Key missing or blank, or `value` missing from a write
    InvalidKey,
    /// `value` present but not a JSON object
    InvalidValueType,
    /// Request body or serialized value over its size ceiling
    PayloadTooLarge,
    /// Request body is not parseable JSON
    MalformedBody,
    /// No secret or store entry under the key, or no such route
    NotFound,
    /// Route exists but not for the request method
    MethodNotAllowed,
    /// Strict auth mode and no bearer token on the request
    MissingToken,
    /// Bearer token rejected by the verifier
    InvalidToken,
    /// The verifier itself failed
    AuthFailure(anyhow::Error),
    /// Store failure, corrupt stored data, or any other unexpected failure
    Server(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidKey
            | ApiError::InvalidValueType
            | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::AuthFailure(_) | ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidKey => "Invalid key",
            ApiError::InvalidValueType => "Value must be a JSON object",
            ApiError::PayloadTooLarge => "Value is too large",
            ApiError::MalformedBody => "Invalid JSON body",
            ApiError::NotFound => "Not found",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::MissingToken => "No token provided",
            ApiError::InvalidToken => "Invalid token",
            ApiError::AuthFailure(_) => "Failed to authenticate token",
            ApiError::Server(_) => "Server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Server(cause) | ApiError::AuthFailure(cause) = &self {
            tracing::debug!(error = %cause, "Internal error withheld from response");
        }

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });

        (self.status(), body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Server(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_map_to_4xx() {
        let (status, body) = render(ApiError::InvalidKey).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid key");

        let (status, body) = render(ApiError::InvalidValueType).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Value must be a JSON object");

        let (status, _) = render(ApiError::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (status, body) = render(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not found");

        let (status, body) = render(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.error, "Method not allowed");

        let (status, _) = render(ApiError::MissingToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_server_error_hides_cause() {
        let err = ApiError::from(anyhow::anyhow!("connection refused (os error 111)"));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Server error");
    }

    #[tokio::test]
    async fn test_auth_failure_is_server_error() {
        let (status, body) = render(ApiError::AuthFailure(anyhow::anyhow!("bad key"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to authenticate token");
    }
}

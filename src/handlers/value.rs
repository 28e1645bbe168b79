use crate::error::{ApiError, ErrorResponse};
use crate::models::{KeyQuery, SecretResponse};
use crate::routes;
use crate::state::AppState;
use crate::validate;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

/// GET /value handler - Retrieve a secret from process configuration
///
/// The key is upper-cased and prefixed with `SECRET_` to form the
/// configuration entry name, so lookups are case-insensitive.
#[utoipa::path(
    get,
    path = routes::VALUE,
    params(KeyQuery),
    responses(
        (status = 200, description = "Successfully retrieved value", body = SecretResponse),
        (status = 400, description = "No key provided", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Value not found", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "values"
)]
pub async fn value_handler(
    State(state): State<AppState>,
    query: Result<Query<KeyQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<SecretResponse>), ApiError> {
    let key = validate::require_query_key(query)?;

    match state.secrets.resolve(&key) {
        Some(secret) => {
            tracing::info!("Resolved secret for key: {}", key.trim());
            Ok((
                StatusCode::OK,
                Json(SecretResponse {
                    data: secret.to_string(),
                }),
            ))
        }
        None => {
            tracing::info!("Secret not found for key: {}", key.trim());
            Err(ApiError::NotFound)
        }
    }
}

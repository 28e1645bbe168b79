use crate::error::{ApiError, ErrorResponse};
use crate::models::{KeyQuery, StoreGetResponse};
use crate::routes;
use crate::state::AppState;
use crate::validate;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

/// GET /store handler - Retrieve a JSON document from the store
#[utoipa::path(
    get,
    path = routes::STORE,
    params(KeyQuery),
    responses(
        (status = 200, description = "Successfully retrieved value", body = StoreGetResponse),
        (status = 400, description = "No key provided", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "store"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    query: Result<Query<KeyQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<StoreGetResponse>), ApiError> {
    let key = validate::require_query_key(query)?;

    let value = state.store.get_value(&key).await.map_err(|e| {
        tracing::error!(key = %key, error = %e, "Error retrieving key");
        ApiError::Server(e)
    })?;

    match value {
        Some(data) => {
            tracing::info!("Successfully retrieved key: {}", key);
            Ok((StatusCode::OK, Json(StoreGetResponse { data })))
        }
        None => {
            tracing::info!("Key not found: {}", key);
            Err(ApiError::NotFound)
        }
    }
}

use crate::error::{ApiError, ErrorResponse};
use crate::models::{StoreSetRequest, StoreSetResponse};
use crate::routes;
use crate::state::AppState;
use crate::validate;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};

/// POST /store handler - Create or overwrite a JSON document in the store
///
/// The body is read as raw bytes so that every validation failure, including
/// bodies over the request size limit, is answered with the same JSON error shape.
#[utoipa::path(
    post,
    path = routes::STORE,
    request_body = StoreSetRequest,
    responses(
        (status = 200, description = "Successfully updated key", body = StoreSetResponse),
        (status = 400, description = "Key and value are required, or value is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 413, description = "Value is too large", body = ErrorResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "store"
)]
pub async fn set_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<StoreSetResponse>), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!(limit = state.config.max_body_size, "Request body exceeds size limit");
            ApiError::PayloadTooLarge
        } else {
            tracing::warn!(error = %rejection, "Failed to read request body");
            ApiError::MalformedBody
        }
    })?;

    let write = validate::validate_store_request(&body, state.config.max_json_size)?;

    state
        .store
        .set_value(&write.key, &write.value)
        .await
        .map_err(|e| {
            tracing::error!(key = %write.key, error = %e, "Error updating key");
            ApiError::Server(e)
        })?;

    tracing::info!("Successfully updated key: {}", write.key);
    Ok((
        StatusCode::OK,
        Json(StoreSetResponse {
            data: format!("Key {} updated successfully", write.key),
        }),
    ))
}

use axum::extract::{rejection::QueryRejection, Query};
use serde_json::{Map, Value as JsonValue};

use crate::error::ApiError;
use crate::models::KeyQuery;

/// A write that passed validation: non-blank key plus a JSON object value
#[derive(Debug, PartialEq)]
pub struct ValidatedWrite {
    pub key: String,
    pub value: Map<String, JsonValue>,
}

/// Require a key that is non-empty once surrounding whitespace is ignored
///
/// The key is returned as supplied; normalization for the store or the
/// secret lookup happens downstream.
pub fn require_key(key: Option<&str>) -> Result<String, ApiError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k.to_string()),
        _ => Err(ApiError::InvalidKey),
    }
}

/// Require a usable `key` from an extracted query string
///
/// A query string that does not deserialize (e.g. `key` given twice) is
/// answered like a missing key instead of with the extractor's plain-text
/// rejection.
pub fn require_query_key(
    query: Result<Query<KeyQuery>, QueryRejection>,
) -> Result<String, ApiError> {
    match query {
        Ok(Query(query)) => require_key(query.key.as_deref()),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected query string");
            Err(ApiError::InvalidKey)
        }
    }
}

/// Validate a `POST /store` body
///
/// Checks run in a fixed order: presence of `key` and `value`, then the
/// type of `value`, then the serialized size of `value` against `max_json_size`.
pub fn validate_store_request(
    body: &[u8],
    max_json_size: usize,
) -> Result<ValidatedWrite, ApiError> {
    if body.trim_ascii().is_empty() {
        return Err(ApiError::InvalidKey);
    }
    let body: JsonValue = serde_json::from_slice(body).map_err(|_| ApiError::MalformedBody)?;

    // A non-object body carries neither field
    let JsonValue::Object(mut fields) = body else {
        return Err(ApiError::InvalidKey);
    };

    let key = match fields.get("key") {
        Some(JsonValue::String(k)) => require_key(Some(k.as_str()))?,
        _ => return Err(ApiError::InvalidKey),
    };

    let value = match fields.remove("value") {
        None => return Err(ApiError::InvalidKey),
        Some(JsonValue::Object(map)) => map,
        Some(_) => return Err(ApiError::InvalidValueType),
    };

    let size = serialized_len(&value)?;
    if size > max_json_size {
        tracing::warn!(
            key = %key,
            size,
            limit = max_json_size,
            "Value exceeds size limit"
        );
        return Err(ApiError::PayloadTooLarge);
    }

    Ok(ValidatedWrite { key, value })
}

fn serialized_len(value: &Map<String, JsonValue>) -> Result<usize, ApiError> {
    serde_json::to_vec(value)
        .map(|bytes| bytes.len())
        .map_err(|e| ApiError::Server(e.into()))
}

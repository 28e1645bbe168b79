use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Query parameters shared by the key lookup endpoints
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeyQuery {
    /// Key to look up
    pub key: Option<String>,
}

/// Response type for secret lookups
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SecretResponse {
    pub data: String,
}

/// Response type for successful store reads
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoreGetResponse {
    pub data: JsonValue,
}

/// Request body for store writes
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoreSetRequest {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: JsonValue,
}

/// Response type for successful store writes
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoreSetResponse {
    pub data: String,
}

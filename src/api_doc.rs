use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{SecretResponse, StoreGetResponse, StoreSetRequest, StoreSetResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "secret-store-api",
        version = "0.1.0",
        description = "Secrets lookup and JSON key-value storage behind JWT authentication"
    ),
    paths(
        handlers::health::health_handler,
        handlers::value::value_handler,
        handlers::get::get_handler,
        handlers::set::set_handler
    ),
    components(
        schemas(
            SecretResponse,
            StoreGetResponse,
            StoreSetRequest,
            StoreSetResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "values", description = "Secret lookup operations"),
        (name = "store", description = "Key-value store operations")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// GET / handler - The OpenAPI document for this service
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

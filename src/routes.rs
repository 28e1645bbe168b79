use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::{openapi_handler, ApiDoc};
use crate::error::{ApiError, ErrorResponse};
use crate::handlers;
use crate::middleware::{auth_gate, AuthMode};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const VALUE: &str = "/value";
pub const STORE: &str = "/store";
pub const DOCS: &str = "/docs";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Assemble the full application router
///
/// The auth gate wraps every route, documentation included.
pub fn router(state: AppState, auth: AuthMode) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route(ROOT, get(openapi_handler))
        .route(HEALTH, get(handlers::health_handler))
        .route(VALUE, get(handlers::value_handler))
        .route(STORE, get(handlers::get_handler).post(handlers::set_handler))
        .merge(SwaggerUi::new(DOCS).url(OPENAPI_JSON, ApiDoc::openapi()))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(middleware::from_fn_with_state(auth, auth_gate))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Server error".to_string(),
        }),
    )
        .into_response()
}

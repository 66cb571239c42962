use crate::errors::AppError;
use crate::lookup::BrpLookup;
use crate::models::{AddressIndicators, Identifier, LookupFailure, LookupResult};
use crate::openapi::ApiDoc;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lookup pipeline holding the one TLS session towards the register.
    pub lookup: BrpLookup,
}

/// Builds the application router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/docs", get(serve_swagger_ui))
        .route("/static/openapi.yaml", get(serve_openapi_spec))
        .route("/brp_brandweer/:bag_id", get(get_location_indicators))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "brp-brandweer",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /brp_brandweer/:bag_id
///
/// Looks up the residents registered at the location and returns the
/// fire-brigade indicators of the first address found.
#[utoipa::path(
    get,
    path = "/brp_brandweer/{bag_id}",
    tag = "brp",
    params(
        ("bag_id" = String, Path, description = "BAG id of the location")
    ),
    responses(
        (status = 200, description = "Indicators for the location", body = AddressIndicators),
        (status = 404, description = "Location could not be resolved", body = LookupFailure),
        (status = 400, description = "Empty location identifier")
    )
)]
pub async fn get_location_indicators(
    State(state): State<Arc<AppState>>,
    Path(bag_id): Path<String>,
) -> Result<Response, AppError> {
    let identifier = Identifier::new(bag_id)?;

    let result = state.lookup.lookup_one(&identifier).await.into_iter().next();

    let response = match result {
        Some(LookupResult::Found(found)) => (StatusCode::OK, Json(found)).into_response(),
        Some(LookupResult::Failed(failed)) => {
            (StatusCode::NOT_FOUND, Json(failed)).into_response()
        }
        // lookup_one always yields at least one result
        None => {
            return Err(AppError::Internal(format!(
                "lookup for {} produced no result",
                identifier
            )))
        }
    };

    Ok(response)
}

/// Serves the OpenAPI document generated from the handler annotations.
async fn serve_openapi_spec() -> Response {
    match ApiDoc::openapi().to_yaml() {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to render OpenAPI document: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "OpenAPI document unavailable",
            )
                .into_response()
        }
    }
}

/// Serves the Swagger UI HTML page for `/static/openapi.yaml`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>BRP Brandweer - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/static/openapi.yaml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

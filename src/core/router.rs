use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::SwaggerConfig;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::bots::{self, BotService};
use crate::features::files::{self, FileService};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn swagger_routes(config: &SwaggerConfig) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match config.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            swagger.layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::docs_basic_auth,
            ))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            swagger
        }
    }
}

/// Assemble the full application: API routes, docs, health check and the
/// static site served for every path nothing else claims
pub fn build_router(
    bot_service: Arc<BotService>,
    file_service: Arc<FileService>,
    swagger: &SwaggerConfig,
    static_dir: &Path,
    cors_allowed_origins: Vec<String>,
) -> Router {
    Router::new()
        .merge(swagger_routes(swagger))
        .merge(bots::routes(bot_service))
        .merge(files::routes(file_service))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::cors_layer(cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use base64::prelude::*;
    use axum::http::{header, HeaderValue};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use crate::shared::test_helpers::{local_file_service, memory_bot_service};

    fn swagger_config(username: Option<&str>, password: Option<&str>) -> SwaggerConfig {
        SwaggerConfig {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            title: "Bot Registry API".to_string(),
            version: "0.1.0".to_string(),
            description: "test".to_string(),
        }
    }

    fn server(swagger: SwaggerConfig) -> (TestServer, TempDir, TempDir) {
        let static_dir = TempDir::new().unwrap();
        std::fs::write(
            static_dir.path().join("index.html"),
            "<html><body>Bot Registry</body></html>",
        )
        .unwrap();
        let (file_service, upload_dir) = local_file_service();

        let app = build_router(
            memory_bot_service(),
            file_service,
            &swagger,
            static_dir.path(),
            vec!["*".to_string()],
        );
        (TestServer::new(app).unwrap(), static_dir, upload_dir)
    }

    #[tokio::test]
    async fn test_root_serves_static_index() {
        let (server, _static_dir, _upload_dir) = server(swagger_config(None, None));

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Bot Registry"));
    }

    #[tokio::test]
    async fn test_bundled_page_percent_encodes_lookup_values() {
        let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("public");
        let (file_service, _upload_dir) = local_file_service();
        let app = build_router(
            memory_bot_service(),
            file_service,
            &swagger_config(None, None),
            &static_dir,
            vec!["*".to_string()],
        );
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        let page = response.text();
        // Form encoding would send spaces as `+`, which lookups keep literally
        assert!(page.contains("encodeURIComponent"));
        assert!(!page.contains("URLSearchParams"));
    }

    #[tokio::test]
    async fn test_unknown_static_path_is_not_found() {
        let (server, _static_dir, _upload_dir) = server(swagger_config(None, None));

        server
            .get("/missing.html")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _static_dir, _upload_dir) = server(swagger_config(None, None));

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_api_routes_are_mounted() {
        let (server, _static_dir, _upload_dir) = server(swagger_config(None, None));

        server
            .post("/api/register-bot")
            .json(&json!({
                "ownerName": "Ada",
                "ownerNumber": "+1555",
                "botName": "Helper",
                "botType": "chat"
            }))
            .await
            .assert_status(StatusCode::OK);

        let response = server.get("/api/list-bots").await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["bots"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let (server, _static_dir, _upload_dir) = server(swagger_config(None, None));

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["info"]["title"], "Bot Registry API");
        assert!(body["paths"]["/api/get-bot"].is_object());
    }

    #[tokio::test]
    async fn test_openapi_document_requires_credentials_when_configured() {
        let (server, _static_dir, _upload_dir) =
            server(swagger_config(Some("admin"), Some("secret")));

        server
            .get("/api-docs/openapi.json")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let token = BASE64_STANDARD.encode("admin:secret");
        server
            .get("/api-docs/openapi.json")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
            )
            .await
            .assert_status(StatusCode::OK);

        // API routes stay open
        server
            .get("/api/list-bots")
            .await
            .assert_status(StatusCode::OK);
    }
}

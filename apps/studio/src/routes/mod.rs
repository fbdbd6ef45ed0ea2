pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::render::handlers as preview;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/session", get(session::handle_get_session))
        .route(
            "/api/v1/session/credential",
            put(session::handle_set_credential).delete(session::handle_clear_credential),
        )
        .route(
            "/api/v1/session/input",
            get(session::handle_get_input).put(session::handle_set_input),
        )
        // Generation
        .route("/api/v1/resumes/generate", post(generation::handle_generate))
        .route("/api/v1/resumes/current", get(generation::handle_get_current))
        .route(
            "/api/v1/resumes/current/json",
            get(generation::handle_get_json),
        )
        .route(
            "/api/v1/resumes/current/download",
            get(generation::handle_download_json),
        )
        // Preview
        .route("/api/v1/preview", get(preview::handle_preview_html))
        .route("/api/v1/preview/tree", get(preview::handle_preview_tree))
        .route("/api/v1/preview/config", put(preview::handle_update_config))
        .route(
            "/api/v1/preview/theme/toggle",
            post(preview::handle_toggle_theme),
        )
        // Export
        .route(
            "/api/v1/export/config",
            get(export::handle_get_export_config).put(export::handle_set_export_config),
        )
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::raster::SoftwareRasterizer;
    use crate::layout::Typesetter;
    use crate::llm_client::testing::ScriptedService;
    use crate::llm_client::LlmError;
    use crate::models::resume::fixtures::jane_doe;
    use crate::session::store::MemorySessionStore;

    const NOTES: &str = "Jane Doe, PM at Tech Solutions since 2020, cut time-to-market by 20%";

    fn app_with(service: Arc<ScriptedService>, credential: Option<&str>) -> Router {
        let config = Config::from_lookup(|key| match key {
            // keep exported rasters small
            "EXPORT_RASTER_SCALE" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let store = MemorySessionStore::with_credential(credential.map(str::to_string));
        let state = AppState::new(
            &config,
            Arc::new(store),
            service,
            Arc::new(Typesetter::default()),
            Arc::new(SoftwareRasterizer::default()),
        );
        build_router(state)
    }

    fn working_service() -> Arc<ScriptedService> {
        ScriptedService::replying(serde_json::to_string(&jane_doe()).unwrap())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn generate(app: &Router) -> Response {
        send(
            app,
            Method::PUT,
            "/api/v1/session/input",
            Some(json!({ "text": NOTES })),
        )
        .await;
        send(app, Method::POST, "/api/v1/resumes/generate", None).await
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(working_service(), None);
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_session() {
        let app = app_with(working_service(), None);

        let snapshot = body_json(send(&app, Method::GET, "/api/v1/session", None).await).await;
        assert_eq!(snapshot["status"], "idle");
        assert_eq!(snapshot["has_document"], false);
        assert_eq!(snapshot["credential_present"], false);
        assert_eq!(snapshot["export_phase"], "idle");
        assert_eq!(snapshot["render_config"]["accentColor"], "#0D9488");

        let input = body_json(send(&app, Method::GET, "/api/v1/session/input", None).await).await;
        assert!(input["text"].as_str().unwrap().contains("Jane Doe"));

        for uri in ["/api/v1/resumes/current", "/api/v1/preview", "/api/v1/preview/tree"] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_placeholder_input_is_rejected_without_a_call() {
        let service = working_service();
        let app = app_with(service.clone(), Some("key-1"));

        let response = send(&app, Method::POST, "/api/v1/resumes/generate", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(service.call_count(), 0);

        let snapshot = body_json(send(&app, Method::GET, "/api/v1/session", None).await).await;
        assert_eq!(
            snapshot["error"],
            "Please enter your resume details before generating."
        );
        assert_eq!(snapshot["status"], "idle");
    }

    #[tokio::test]
    async fn test_missing_credential_prompts() {
        let service = working_service();
        let app = app_with(service.clone(), None);

        let response = generate(&app).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(service.call_count(), 0);

        let snapshot = body_json(send(&app, Method::GET, "/api/v1/session", None).await).await;
        assert_eq!(snapshot["credential_prompt"], true);

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/session/credential",
            Some(json!({ "apiKey": "key-2" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::POST, "/api/v1/resumes/generate", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(service.calls()[0].0, "key-2");
    }

    #[tokio::test]
    async fn test_blank_credential_rejected() {
        let app = app_with(working_service(), None);
        let response = send(
            &app,
            Method::PUT,
            "/api/v1/session/credential",
            Some(json!({ "apiKey": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_then_read_back() {
        let app = app_with(working_service(), Some("key-1"));

        let response = generate(&app).await;
        assert_eq!(response.status(), StatusCode::OK);
        let generated = body_json(response).await;
        assert_eq!(generated["resume"]["personalInfo"]["name"], "Jane Doe");
        assert!(generated["quality"]["findings"].is_array());

        let current = body_json(send(&app, Method::GET, "/api/v1/resumes/current", None).await).await;
        assert_eq!(current, serde_json::to_value(jane_doe()).unwrap());

        let response = send(&app, Method::GET, "/api/v1/resumes/current/json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.starts_with("{\n  \"personalInfo\""));

        let response = send(&app, Method::GET, "/api/v1/resumes/current/download", None).await;
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.json\""
        );

        let response = send(&app, Method::GET, "/api/v1/preview", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Tech Solutions Inc"));
        assert!(html.contains("mailto:jane.doe@email.com"));
    }

    #[tokio::test]
    async fn test_invalid_credential_clears_document_and_prompts() {
        let calls = AtomicUsize::new(0);
        let doc = serde_json::to_string(&jane_doe()).unwrap();
        // first attempt succeeds, later ones are rejected
        let service = ScriptedService::new(move || {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(doc.clone())
            } else {
                Err(LlmError::Unauthorized(
                    "API key not valid. Please pass a valid API key.".into(),
                ))
            }
        });
        let app = app_with(service, Some("key-1"));
        assert_eq!(generate(&app).await.status(), StatusCode::OK);

        let response = send(&app, Method::POST, "/api/v1/resumes/generate", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "CREDENTIAL_INVALID");

        let snapshot = body_json(send(&app, Method::GET, "/api/v1/session", None).await).await;
        assert_eq!(snapshot["status"], "failed");
        assert_eq!(snapshot["credential_prompt"], true);
        assert_eq!(snapshot["has_document"], false);
        let current = send(&app, Method::GET, "/api/v1/resumes/current", None).await;
        assert_eq!(current.status(), StatusCode::NOT_FOUND);
        let json = send(&app, Method::GET, "/api/v1/resumes/current/json", None).await;
        assert_eq!(json.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_response_reports_generation_error() {
        let app = app_with(ScriptedService::replying("not json".to_string()), Some("key-1"));
        let response = generate(&app).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate resume. Please check your input and try again. Error: "));
    }

    #[tokio::test]
    async fn test_preview_config_and_theme_toggle() {
        let app = app_with(working_service(), Some("key-1"));
        generate(&app).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/preview/config",
            Some(json!({ "accentColor": "#2563EB", "includedSections": { "skills": false } })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let config = body_json(response).await;
        assert_eq!(config["accentColor"], "#2563EB");
        assert_eq!(config["theme"], "light");
        assert_eq!(config["includedSections"]["skills"], false);
        assert_eq!(config["includedSections"]["summary"], true);

        let html = String::from_utf8(
            body_bytes(send(&app, Method::GET, "/api/v1/preview", None).await).await,
        )
        .unwrap();
        assert!(!html.contains("Public Speaking"));

        let toggled = body_json(send(&app, Method::POST, "/api/v1/preview/theme/toggle", None).await).await;
        assert_eq!(toggled["theme"], "dark");
        let tree = body_json(send(&app, Method::GET, "/api/v1/preview/tree", None).await).await;
        assert_eq!(tree["theme"], "dark");

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/preview/config",
            Some(json!({ "accentColor": "teal" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_config_and_pdf() {
        let app = app_with(working_service(), Some("key-1"));

        let response = send(&app, Method::POST, "/api/v1/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        generate(&app).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/export/config",
            Some(json!({ "paperSize": "letter", "orientation": "landscape", "theme": "dark" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let config = body_json(send(&app, Method::GET, "/api/v1/export/config", None).await).await;
        assert_eq!(config["paperSize"], "letter");
        assert_eq!(config["includedSections"]["education"], true);

        // export settings never touch the live preview
        let tree = body_json(send(&app, Method::GET, "/api/v1/preview/tree", None).await).await;
        assert_eq!(tree["theme"], "light");

        let response = send(&app, Method::POST, "/api/v1/export/pdf", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        let pdf = body_bytes(response).await;
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/MediaBox [0 0 792.00 612.00]"));

        let snapshot = body_json(send(&app, Method::GET, "/api/v1/session", None).await).await;
        assert_eq!(snapshot["exporting"], false);
        assert_eq!(snapshot["export_phase"], "idle");
    }

    #[tokio::test]
    async fn test_invalid_export_config_rejected() {
        let app = app_with(working_service(), Some("key-1"));
        let response = send(
            &app,
            Method::PUT,
            "/api/v1/export/config",
            Some(json!({ "paperSize": "A3" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }
}

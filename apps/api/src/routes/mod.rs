pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::translation::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Translation API
        .route("/api/v1/languages", get(handlers::handle_list_languages))
        .route("/api/v1/translate", post(handlers::handle_translate))
        .route(
            "/api/v1/resumes/:id/translate",
            post(handlers::handle_translate_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::llm_client::TextGenerator;
    use crate::translation::content::ContentNode;
    use crate::translation::invoker::ModelPair;
    use crate::translation::pipeline::Translator;
    use crate::translation::retry::RetryPolicy;
    use crate::translation::testing::{overloaded, MemoryDocumentStore, RecordingPool, ScriptedGenerator};

    fn state(
        generator: Arc<dyn TextGenerator>,
        credentials: usize,
        documents: Arc<MemoryDocumentStore>,
    ) -> AppState {
        AppState {
            documents,
            translator: Arc::new(Translator::new(
                generator,
                Arc::new(RecordingPool::with_credentials(credentials)),
                ModelPair {
                    primary: "fast-model".to_string(),
                    fallback: "strong-model".to_string(),
                },
                RetryPolicy::default(),
                "anthropic",
            )),
        }
    }

    fn german_echo() -> Arc<dyn TextGenerator> {
        Arc::new(ScriptedGenerator::echo(|text| match text {
            "Engineer" => "Ingenieur".to_string(),
            other => other.to_string(),
        }))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state(german_echo(), 1, Arc::default()));
        let (status, body) = send(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_languages_lists_closed_set() {
        let app = build_router(state(german_echo(), 1, Arc::default()));
        let (status, body) = send(app, "GET", "/api/v1/languages", None).await;
        assert_eq!(status, StatusCode::OK);
        let languages = body["languages"].as_array().unwrap();
        assert_eq!(languages.len(), 7);
        assert!(languages
            .iter()
            .any(|l| l["code"] == "az" && l["id"] == "azerbaijani"));
    }

    #[tokio::test]
    async fn test_translate_inline_document() {
        let app = build_router(state(german_echo(), 1, Arc::default()));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/translate",
            Some(json!({
                "document": {"experience": [{"position": "Engineer", "startDate": "May 2021"}]},
                "target_language": "de"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["experience"][0]["position"], "Ingenieur");
        assert_eq!(body["document"]["experience"][0]["startDate"], "Mai 2021");
        assert_eq!(body["metadata"]["source_language"], "auto");
        assert_eq!(body["metadata"]["target_language"], "german");
        assert_eq!(body["metadata"]["sections_translated"], json!(["experience"]));
    }

    #[tokio::test]
    async fn test_translate_without_sections_is_validation_error() {
        let app = build_router(state(german_echo(), 1, Arc::default()));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/translate",
            Some(json!({"document": {"id": "1"}, "target_language": "german"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_translate_without_credentials_is_unavailable() {
        let app = build_router(state(german_echo(), 0, Arc::default()));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/translate",
            Some(json!({"document": {"summary": "Engineer"}, "target_language": "german"})),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_show_localized_hint() {
        let generator: Arc<dyn TextGenerator> =
            Arc::new(ScriptedGenerator::always(|| Err(overloaded())));
        let app = build_router(state(generator, 1, Arc::default()));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/translate",
            Some(json!({"document": {"summary": "Engineer"}, "target_language": "az"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "TRANSLATION_FAILED");
        assert_eq!(
            body["error"]["message"],
            crate::translation::language::Language::Azerbaijani.failure_hint()
        );
        assert!(!body["error"]["message"].as_str().unwrap().contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_translate_stored_resume_and_save() {
        let id = Uuid::new_v4();
        let documents = Arc::new(MemoryDocumentStore::with_document(
            id,
            ContentNode::from(json!({"id": "r-1", "summary": "Engineer"})),
        ));
        let app = build_router(state(german_echo(), 1, documents.clone()));

        let (status, body) = send(
            app,
            "POST",
            &format!("/api/v1/resumes/{id}/translate"),
            Some(json!({"target_language": "german", "source_language": "english", "save": true})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], true);
        assert_eq!(body["document"]["summary"], "Ingenieur");
        assert_eq!(body["metadata"]["source_language"], "english");
        let stored = documents.get(id).unwrap().to_json();
        assert_eq!(stored["summary"], "Ingenieur");
        assert_eq!(stored["id"], "r-1");
    }

    #[tokio::test]
    async fn test_translate_stored_resume_without_save_leaves_store_alone() {
        let id = Uuid::new_v4();
        let original = ContentNode::from(json!({"summary": "Engineer"}));
        let documents = Arc::new(MemoryDocumentStore::with_document(id, original.clone()));
        let app = build_router(state(german_echo(), 1, documents.clone()));

        let (status, body) = send(
            app,
            "POST",
            &format!("/api/v1/resumes/{id}/translate"),
            Some(json!({"target_language": "german"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], false);
        assert_eq!(documents.get(id), Some(original));
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let app = build_router(state(german_echo(), 1, Arc::default()));
        let (status, body) = send(
            app,
            "POST",
            &format!("/api/v1/resumes/{}/translate", Uuid::new_v4()),
            Some(json!({"target_language": "german"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

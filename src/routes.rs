use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config_manager::Stage;
use crate::error::PipelineError;
use crate::stages;
use crate::state::AppState;

/// Routes for the stages this process serves, plus health.
///
/// A stage that is not enabled gets no route, so deliveries to it are a 404.
pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    let mut router = Router::new().route("/api/health", get(health_check));

    for stage in Stage::ALL {
        if !system_config.is_enabled(stage) {
            continue;
        }
        info!("Serving stage {} on POST {}", stage.as_str(), stage.route());
        router = match stage {
            Stage::Extract => router.route(stage.route(), post(extract_push)),
            Stage::Translate => router.route(stage.route(), post(translate_push)),
            Stage::Save => router.route(stage.route(), post(save_push)),
        };
    }

    router
}

type PushResponse = Result<StatusCode, (StatusCode, Json<Value>)>;

fn respond<T>(stage: Stage, result: Result<T, PipelineError>) -> PushResponse {
    match result {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("{} failed: {}", stage.as_str(), e);
            Err((e.status_code(), Json(json!({ "error": e.to_string() }))))
        }
    }
}

async fn extract_push(State(state): State<AppState>, body: Bytes) -> PushResponse {
    respond(
        Stage::Extract,
        stages::handle_object_finalized_push(&state, &body).await,
    )
}

async fn translate_push(State(state): State<AppState>, body: Bytes) -> PushResponse {
    respond(
        Stage::Translate,
        stages::handle_translation_push(&state, &body).await,
    )
}

async fn save_push(State(state): State<AppState>, body: Bytes) -> PushResponse {
    respond(
        Stage::Save,
        stages::handle_translation_result_push(&state, &body).await,
    )
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let stages: Vec<&str> = state
        .config
        .system_config
        .stages
        .iter()
        .map(|s| s.as_str())
        .collect();
    Json(json!({
        "status": "ok",
        "stages": stages
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_support::{test_config, StateBuilder};
    use crate::storage::MemoryObjectStore;

    fn app(state: AppState) -> Router {
        create_routes(&state).with_state(state)
    }

    fn push(uri: &str, data: &str) -> Request<Body> {
        let body = json!({
            "message": { "data": STANDARD.encode(data), "messageId": "1" }
        });
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn save_push_stores_the_result() {
        let store = Arc::new(MemoryObjectStore::new());
        let state = StateBuilder::new(test_config(&["es"]))
            .object_store(store.clone())
            .build();

        let response = app(state)
            .oneshot(push(
                "/save",
                r#"{"text":"ALTO","filename":"sign.jpg","lang":"es"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let stored = store.get("result-turbo-memory", "sign.jpg_to_es.txt").unwrap();
        assert_eq!(stored.body, b"ALTO");
    }

    #[tokio::test]
    async fn malformed_translate_push_is_bad_request() {
        let state = StateBuilder::new(test_config(&["es"])).build();

        let response = app(state)
            .oneshot(push("/translate", "{ nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unsupported_language_is_unprocessable() {
        let state = StateBuilder::new(test_config(&["es"])).build();

        let response = app(state)
            .oneshot(push(
                "/translate",
                r#"{"text":"Hola","filename":"a.png","lang":"de"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "non supported language de");
    }

    #[tokio::test]
    async fn disabled_stage_has_no_route() {
        let mut config = test_config(&["es"]);
        config.system_config.stages = vec![Stage::Save];
        let state = StateBuilder::new(config).build();

        let response = app(state)
            .oneshot(push("/extract", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_lists_enabled_stages() {
        let mut config = test_config(&["es"]);
        config.system_config.stages = vec![Stage::Translate, Stage::Save];
        let state = StateBuilder::new(config).build();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "status": "ok", "stages": ["translate", "save"] }));
    }
}

//! Relay behaviour of `POST /generate-phrases` against a mock provider.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_json, TestApp};
use phrase_service::services::prompts::SYSTEM_PROMPT;
use phrase_service::services::providers::mock::MockTextProvider;
use serde_json::json;

fn provider_content() -> serde_json::Value {
    json!([
        {
            "type": "text",
            "text": "### Command Tonality:\nDisfruto cada paso y avanzo con calma."
        }
    ])
}

#[tokio::test]
async fn valid_input_returns_provider_content_unmodified() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let (status, body) = app
        .post_json(
            "/generate-phrases",
            r#"{"userInput":"quiero motivación para estudiar"}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": provider_content() }));
}

#[tokio::test]
async fn valid_input_issues_exactly_one_call_with_verbatim_content() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let (status, _) = app
        .post_json(
            "/generate-phrases",
            r#"{"userInput":"  quiero motivación para estudiar  "}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let calls = app.provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].user_input, "  quiero motivación para estudiar  ");
    assert_eq!(calls[0].system_prompt, SYSTEM_PROMPT);
}

#[tokio::test]
async fn empty_object_is_rejected_without_calling_provider() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let (status, body) = app.post_json("/generate-phrases", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "❌ Se requiere texto de entrada" }));
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn top_level_array_is_rejected_without_calling_provider() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    for body in [r#"["hola"]"#, r#"[{"userInput":"hola"}]"#, r#""hola""#] {
        let (status, response) = app.post_json("/generate-phrases", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            response,
            json!({ "error": "❌ Se requiere texto de entrada" }),
            "{body}"
        );
    }
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn falsy_inputs_are_rejected_without_calling_provider() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    for body in [
        r#"{"userInput":""}"#,
        r#"{"userInput":null}"#,
        r#"{"userInput":false}"#,
        r#"{"userInput":0}"#,
    ] {
        let (status, response) = app.post_json("/generate-phrases", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["error"], "❌ Se requiere texto de entrada", "{body}");
    }

    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn non_string_input_is_rejected() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let (status, body) = app
        .post_json("/generate-phrases", r#"{"userInput":{"text":"hola"}}"#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "❌ El texto de entrada debe ser una cadena");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected_with_details() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let (status, body) = app
        .post_json("/generate-phrases", r#"{"userInput": "hola""#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "❌ Cuerpo JSON inválido");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn body_without_json_content_type_counts_as_missing_input() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/generate-phrases")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("quiero motivación"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "❌ Se requiere texto de entrada" }));
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_returns_500_with_details() {
    let app = TestApp::new(MockTextProvider::failing("connection reset by peer"));

    let (status, body) = app
        .post_json("/generate-phrases", r#"{"userInput":"quiero dormir mejor"}"#)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "❌ Error al generar frases");
    let details = body["details"].as_str().expect("details must be a string");
    assert!(details.contains("connection reset by peer"), "{details}");
    assert!(body.get("result").is_none());
    assert_eq!(app.provider.call_count(), 1);
}

#[tokio::test]
async fn repeated_requests_are_not_deduplicated() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));
    let request = r#"{"userInput":"quiero motivación para estudiar"}"#;

    let (first, _) = app.post_json("/generate-phrases", request).await;
    let (second, _) = app.post_json("/generate-phrases", request).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(app.provider.call_count(), 2);
}

#[tokio::test]
async fn concurrent_requests_each_reach_the_provider() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let requests = (0..8).map(|i| {
        let router = app.router.clone();
        async move {
            use tower::util::ServiceExt;
            router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/generate-phrases")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(format!(r#"{{"userInput":"objetivo {i}"}}"#)))
                        .unwrap(),
                )
                .await
                .unwrap()
                .status()
        }
    });

    let statuses = spawn_all(requests).await;

    assert!(statuses.iter().all(|s| *s == StatusCode::OK));
    let mut inputs: Vec<String> = app
        .provider
        .calls()
        .into_iter()
        .map(|c| c.user_input)
        .collect();
    inputs.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("objetivo {i}")).collect();
    expected.sort();
    assert_eq!(inputs, expected);
}

async fn spawn_all<F>(futures: impl Iterator<Item = F>) -> Vec<StatusCode>
where
    F: std::future::Future<Output = StatusCode> + Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut statuses = Vec::with_capacity(handles.len());
    for handle in handles {
        statuses.push(handle.await.expect("request task panicked"));
    }
    statuses
}

#[tokio::test]
async fn get_is_not_allowed_on_generate_route() {
    let app = TestApp::new(MockTextProvider::with_content(provider_content()));

    let response = app.get("/generate-phrases").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.provider.call_count(), 0);
}

use std::time::Duration;

use auralis_engine::{ApiVersion, Backend, BackendSettings, FailureKind, ReqwestBackend};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer, api_version: ApiVersion) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        api_version,
        ..BackendSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn ingest_posts_content_and_parses_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/process_page"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "content": "Hello world",
            "url": "https://example.com/",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "initial_questions": ["What is this?"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let output = backend
        .ingest_page("Hello world", "https://example.com/")
        .await
        .expect("ingest ok");

    assert!(output.succeeded());
    assert_eq!(output.initial_questions, vec!["What is this?".to_string()]);
}

#[tokio::test]
async fn ingest_accepts_newline_delimited_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process_page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "initial_questions": "First?\nSecond?\n\n",
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::Legacy);
    let output = backend.ingest_page("text", "https://x/").await.unwrap();
    assert_eq!(
        output.initial_questions,
        vec!["First?".to_string(), "Second?".to_string()]
    );
}

#[tokio::test]
async fn ingest_with_non_success_status_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/process_page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "error"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let output = backend.ingest_page("text", "https://x/").await.unwrap();
    assert!(!output.succeeded());
    assert_eq!(output.status, "error");
    assert!(output.initial_questions.is_empty());
}

#[tokio::test]
async fn ask_sends_camel_case_payload_and_parses_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ask_question"))
        .and(body_json(serde_json::json!({
            "query": "Meaning?",
            "currentUrl": "https://b/",
            "processedUrls": ["https://a/", "https://b/"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "42",
            "sources": ["docA"],
            "suggested_questions": ["Why?"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let processed = vec!["https://a/".to_string(), "https://b/".to_string()];
    let answer = backend
        .ask_question("Meaning?", "https://b/", &processed)
        .await
        .expect("answer");

    assert_eq!(answer.answer, "42");
    assert_eq!(answer.sources, vec!["docA".to_string()]);
    assert_eq!(answer.suggested_questions, vec!["Why?".to_string()]);
}

#[tokio::test]
async fn ask_tolerates_missing_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ask_question"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": "Only this"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let answer = backend.ask_question("q", "https://a/", &[]).await.unwrap();
    assert_eq!(answer.answer, "Only this");
    assert!(answer.sources.is_empty());
    assert!(answer.suggested_questions.is_empty());
}

#[tokio::test]
async fn http_error_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ask_question"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "Please process a page first"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let err = backend.ask_question("q", "", &[]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "Please process a page first");
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ask_question"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server, ApiVersion::V2);
    let err = backend.ask_question("q", "", &[]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Parse);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/process_page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({"status": "success"})),
        )
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.ingest_page("text", "https://x/").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.ingest_page("text", "https://x/").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn invalid_base_url_is_rejected_before_sending() {
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: "not a url".to_string(),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.ingest_page("text", "https://x/").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

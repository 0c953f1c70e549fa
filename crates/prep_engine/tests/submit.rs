use std::time::Duration;

use prep_engine::{FailureKind, FormData, ReqwestSubmitter, SubmitSettings, Submitter};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn meeting_form() -> FormData {
    FormData::new()
        .with("company_name", "Acme")
        .with("meeting_objective", "Renewal")
        .with("attendees", "Dana, Lee")
        .with("meeting_duration", "30")
        .with("focus_areas", "pricing")
}

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}/prepare_meeting", server.uri())).unwrap()
}

#[tokio::test]
async fn posts_form_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r##"{"result": "# Agenda\n- Item1", "html_result": "<h1>Agenda</h1>"}"##,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings::default());
    let response = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .expect("submit ok");

    assert_eq!(response.result.as_deref(), Some("# Agenda\n- Item1"));
    assert_eq!(response.html_result.as_deref(), Some("<h1>Agenda</h1>"));
    assert_eq!(response.error, None);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"company_name\""));
    assert!(body.contains("Acme"));
    assert!(body.contains("name=\"focus_areas\""));
}

#[tokio::test]
async fn error_status_with_json_message_is_surfaced_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw(r#"{"error": "missing API key"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings::default());
    let err = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "missing API key");
}

#[tokio::test]
async fn error_status_without_json_uses_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings::default());
    let err = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "Server returned 503: Service Unavailable");
}

#[tokio::test]
async fn success_with_invalid_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let submitter = ReqwestSubmitter::new(SubmitSettings::default());
    let err = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert!(err.message.starts_with("Invalid response from server"));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("{}", "application/json"),
        )
        .mount(&server)
        .await;

    let settings = SubmitSettings {
        request_timeout: Duration::from_millis(50),
        ..SubmitSettings::default()
    };
    let submitter = ReqwestSubmitter::new(settings);
    let err = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/prepare_meeting"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"result": "0123456789"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = SubmitSettings {
        max_bytes: 10,
        ..SubmitSettings::default()
    };
    let submitter = ReqwestSubmitter::new(settings);
    let err = submitter
        .submit(&endpoint(&server), &meeting_form())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 10, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    let server = MockServer::start().await;
    let url = endpoint(&server);
    drop(server);

    let submitter = ReqwestSubmitter::new(SubmitSettings::default());
    let err = submitter.submit(&url, &meeting_form()).await.unwrap_err();

    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

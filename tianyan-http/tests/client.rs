use serde::Deserialize;
use std::time::Duration;
use tianyan_http::{HttpClient, HttpError, RequestOpts};
use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Envelope {
    status: i64,
    response: String,
}

#[tokio::test]
async fn post_form_sends_multipart_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"q\""))
        .and(body_string_contains("rust lang"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": 1, "response": "[]"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let env: Envelope = client
        .post_form_json("search/", &[("q", "rust lang")], RequestOpts::default())
        .await
        .unwrap();

    assert_eq!(env.status, 1);
    assert_eq!(env.response, "[]");
}

#[tokio::test]
async fn get_json_passes_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("c", "d"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"hitokoto": "hi"})),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: serde_json::Value = client
        .get_json(
            "",
            RequestOpts {
                query: Some(vec![("c", "d".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(got["hitokoto"], "hi");
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(serde_json::json!({"detail": "busy"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_form_json::<Envelope>("search/", &[("q", "x")], RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status, message, ..
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "busy");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<serde_json::Value>("", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("oops")),
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client
        .get_json::<serde_json::Value>("", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)));
}

#[tokio::test]
async fn absolute_paths_bypass_base_when_allowed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let client = HttpClient::new("http://127.0.0.1:9/unused/").unwrap();
    let got: serde_json::Value = client
        .get_json(
            &format!("{}/elsewhere", server.uri()),
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(got["ok"], true);
}

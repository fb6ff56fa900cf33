//! `ScriptLoader` driving `HttpScriptSource` against wiremock.

use std::sync::Arc;

use tourmap_map::{HttpScriptSource, LoadStatus, ScriptLoadError, ScriptLoader};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCRIPT_PATH: &str = "/maps/api/js";

fn loader(base_url: &str) -> ScriptLoader {
    let source = HttpScriptSource::new(5).expect("client construction should not fail");
    ScriptLoader::new(
        Arc::new(source),
        base_url,
        "test-key",
        &["places".to_owned()],
    )
    .expect("valid base url")
}

#[tokio::test]
async fn script_is_fetched_once_and_then_reported_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .and(query_param("key", "test-key"))
        .and(query_param("libraries", "places"))
        .and(query_param("callback", "initMap"))
        .respond_with(ResponseTemplate::new(200).set_body_string("window.initMap && initMap();"))
        .expect(1)
        .mount(&server)
        .await;

    let loader = loader(&server.uri());
    let (a, b) = tokio::join!(loader.ensure_loaded(), loader.ensure_loaded());
    a.unwrap();
    b.unwrap();
    loader.ensure_loaded().await.unwrap();

    assert_eq!(loader.status(), LoadStatus::Ready);
    assert_eq!(loader.attempts(), 1);
}

#[tokio::test]
async fn forbidden_script_fails_without_leaking_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&server)
        .await;

    let loader = loader(&server.uri());
    let err = loader.ensure_loaded().await.unwrap_err();

    match &err {
        ScriptLoadError::Status { status, url } => {
            assert_eq!(*status, 403);
            assert!(!url.contains("test-key"), "key leaked: {url}");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    assert_eq!(loader.status(), LoadStatus::NotLoaded);

    // Failure is not cached; the next call requests the script again.
    assert!(loader.ensure_loaded().await.is_err());
    assert_eq!(loader.attempts(), 2);
}

#[tokio::test]
async fn empty_script_body_is_a_load_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let loader = loader(&server.uri());
    let err = loader.ensure_loaded().await.unwrap_err();

    assert!(matches!(err, ScriptLoadError::EmptyScript { .. }));
}

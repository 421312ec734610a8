//! Integration tests for PlantUmlClient against a local HTTP server

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use plantuml_render::{encoding, PlantUmlClient, RenderError, RetryPolicy};

const SOURCE: &str = "@startuml\nclass Customer\nclass Order\nCustomer --> \"*\" Order\n@enduml\n";

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    body: Vec<u8>,
}

/// Answers requests with scripted statuses (200 once the script runs out)
#[derive(Clone, Default)]
struct Recorder {
    statuses: Arc<Mutex<VecDeque<u16>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, String) {
    let attempt = {
        let mut requests = recorder.requests.lock().unwrap();
        requests.push(Recorded {
            method,
            path: uri.path().to_string(),
            body: body.to_vec(),
        });
        requests.len()
    };

    let status = recorder.statuses.lock().unwrap().pop_front().unwrap_or(200);
    let status = StatusCode::from_u16(status).unwrap();
    if status == StatusCode::OK {
        (status, format!("<svg data-attempt=\"{}\"/>", attempt))
    } else {
        (status, format!("rejected attempt {}", attempt))
    }
}

async fn spawn_server(statuses: &[u16]) -> (String, Recorder) {
    let recorder = Recorder {
        statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
        ..Default::default()
    };
    let app = Router::new()
        .fallback(handle)
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorder)
}

fn client_for(base: &str, delay: Duration) -> PlantUmlClient {
    PlantUmlClient::new()
        .with_default_server(format!("{}/plantuml", base))
        .with_retry_policy(RetryPolicy::new().with_delay(delay))
}

fn fast_client(base: &str) -> PlantUmlClient {
    client_for(base, Duration::from_millis(10))
}

#[tokio::test]
async fn test_get_without_server() {
    let (base, recorder) = spawn_server(&[200]).await;

    let svg = fast_client(&base).render_svg(SOURCE, None).await.unwrap();
    assert_eq!(svg, b"<svg data-attempt=\"1\"/>");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(
        requests[0].path,
        format!("/plantuml/svg/{}", encoding::encode(SOURCE).unwrap())
    );
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_get_token_decodes_to_source() {
    let (base, recorder) = spawn_server(&[200]).await;

    fast_client(&base).render_svg(SOURCE, None).await.unwrap();

    let path = recorder.requests()[0].path.clone();
    let token = path.strip_prefix("/plantuml/svg/").unwrap();
    assert_eq!(encoding::decode(token).unwrap(), SOURCE);
}

#[tokio::test]
async fn test_post_with_explicit_server() {
    let (base, recorder) = spawn_server(&[200]).await;

    let svg = fast_client("http://127.0.0.1:9")
        .render_svg(SOURCE, Some(base.as_str()))
        .await
        .unwrap();
    assert_eq!(svg, b"<svg data-attempt=\"1\"/>");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/svg");
    assert_eq!(requests[0].body, SOURCE.as_bytes());
}

#[tokio::test]
async fn test_forbidden_then_ok_returns_second_body() {
    let (base, recorder) = spawn_server(&[403, 200]).await;

    let svg = fast_client(&base).render_svg(SOURCE, None).await.unwrap();
    assert_eq!(svg, b"<svg data-attempt=\"2\"/>");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, requests[1].method);
    assert_eq!(requests[0].path, requests[1].path);
}

#[tokio::test]
async fn test_forbidden_twice_is_final() {
    let (base, recorder) = spawn_server(&[403, 403, 200]).await;

    let err = fast_client(&base).render_svg(SOURCE, None).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("403"));
    assert_eq!(recorder.requests().len(), 2);
}

#[tokio::test]
async fn test_post_retry_resends_same_body() {
    let (base, recorder) = spawn_server(&[403, 200]).await;

    let svg = fast_client(&base)
        .render_svg(SOURCE, Some(base.as_str()))
        .await
        .unwrap();
    assert_eq!(svg, b"<svg data-attempt=\"2\"/>");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/svg");
        assert_eq!(request.body, SOURCE.as_bytes());
    }
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let (base, recorder) = spawn_server(&[500, 200]).await;

    let err = fast_client(&base).render_svg(SOURCE, None).await.unwrap_err();
    match &err {
        RenderError::ServerError { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "rejected attempt 1");
        }
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(recorder.requests().len(), 1);
}

#[tokio::test]
async fn test_other_success_status_is_failure() {
    let (base, recorder) = spawn_server(&[204]).await;

    let err = fast_client(&base).render_svg(SOURCE, None).await.unwrap_err();
    assert_eq!(err.status(), Some(204));
    assert_eq!(recorder.requests().len(), 1);
}

#[tokio::test]
async fn test_retry_waits_for_delay() {
    let (base, _recorder) = spawn_server(&[403, 200]).await;
    let client = client_for(&base, Duration::from_millis(200));

    let started = Instant::now();
    client.render_svg(SOURCE, None).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_connection_failure_surfaces_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fast_client("http://127.0.0.1:9")
        .render_svg(SOURCE, Some(format!("http://{}", addr).as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, RenderError::Http(_)), "{:?}", err);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_cancel_during_retry_delay() {
    let (base, recorder) = spawn_server(&[403, 200]).await;
    let client = client_for(&base, Duration::from_secs(10));

    let result =
        tokio::time::timeout(Duration::from_millis(300), client.render_svg(SOURCE, None)).await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(recorder.requests().len(), 1);
}

#[tokio::test]
async fn test_concurrent_renders() {
    let (base, recorder) = spawn_server(&[]).await;
    let client = fast_client(&base);

    let (a, b, c) = tokio::join!(
        client.render_svg("@startuml\nA -> B\n@enduml", None),
        client.render_svg("@startuml\nB -> C\n@enduml", None),
        client.render_svg("@startuml\nC -> A\n@enduml", Some(base.as_str())),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(recorder.requests().len(), 3);
}

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use reqwest::Method;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use ovh_api_client::auth::{Clock, Credentials, sign_request};
use ovh_api_client::config::Configuration;
use ovh_api_client::error::OvhError;
use ovh_api_client::rest::{OvhClient, ResponseBody};

/// Advances one second per reading.
struct StepClock(AtomicI64);

impl StepClock {
    fn starting_at(timestamp: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(timestamp)))
    }
}

impl Clock for StepClock {
    fn unix_timestamp(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn configuration(api_host: impl Into<String>) -> Configuration {
    Configuration::builder()
        .application_key("ak")
        .application_secret("s")
        .consumer_key("c")
        .api_host(api_host)
        .user_agent("ovh-api-client-tests")
        .build()
        .unwrap()
}

fn build_client(server: &MockServer) -> OvhClient {
    init_tracing();
    OvhClient::builder(configuration(server.uri()))
        .clock(StepClock::starting_at(1_700_000_000))
        .retry_bounds(Duration::from_millis(1), Duration::from_millis(5))
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

fn header_str<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}

/// Recompute the signature the server would expect for a received request.
///
/// The mock server reports received URLs against `localhost`, so the
/// signed URI is rebuilt from the server's own address.
fn expected_signature(server: &MockServer, request: &Request, body: &str) -> String {
    let timestamp: i64 = header_str(request, "x-ovh-timestamp")
        .unwrap()
        .parse()
        .unwrap();
    let uri = format!("{}{}", server.uri(), request.url.path());
    let query = request.url.query().unwrap_or_default();

    let method = Method::from_bytes(request.method.as_str().as_bytes()).unwrap();
    sign_request(
        &Credentials::new("ak", "s", "c"),
        &method,
        &uri,
        query,
        body,
        timestamp,
    )
    .signature
}

fn invalid_json() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw("{not json", "application/json")
}

#[tokio::test]
async fn test_signed_get_carries_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .and(header("X-Ovh-Application", "ak"))
        .and(header("x-Ovh-Consumer", "c"))
        .and(header("X-Ovh-Timestamp", "1700000000"))
        .and(header("User-Agent", "ovh-api-client-tests"))
        .and(header_exists("X-Ovh-Signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nichandle": "ab1234-ovh"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.get("/me").send().await.unwrap().unwrap();

    assert!(response.is_success());
    assert_eq!(response.body, ResponseBody::Json(json!({"nichandle": "ab1234-ovh"})));

    let requests = server.received_requests().await.unwrap();
    let signature = header_str(&requests[0], "x-ovh-signature").unwrap();
    assert_eq!(signature, expected_signature(&server, &requests[0], ""));
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_post_signs_query_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/vps/vps-1/snapshot"))
        .and(query_param("a", "1"))
        .and(query_param("b", "x y"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"description": "nightly"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client
        .post("/vps/vps-1/snapshot")
        .query("a", 1)
        .query("b", "x y")
        .json(&json!({"description": "nightly"}))
        .send()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.body.as_json(), Some(&json!({"id": 42})));

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert_eq!(body, r#"{"description":"nightly"}"#);
    assert_eq!(
        header_str(&requests[0], "x-ovh-signature").unwrap(),
        expected_signature(&server, &requests[0], &body)
    );
}

#[tokio::test]
async fn test_unsigned_request_keeps_caller_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1_700_000_000)))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client
        .get("/auth/time")
        .header("X-Ovh-Signature", "caller-value")
        .sign_request(false)
        .send()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.json::<i64>().unwrap(), 1_700_000_000);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(header_str(&requests[0], "x-ovh-signature"), Some("caller-value"));
    assert_eq!(header_str(&requests[0], "x-ovh-application"), Some("ak"));
    assert!(header_str(&requests[0], "x-ovh-timestamp").is_none());
    assert!(header_str(&requests[0], "x-ovh-consumer").is_none());
}

#[tokio::test]
async fn test_auth_headers_override_caller_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = build_client(&server);
    client
        .get("/me")
        .header("X-Ovh-Signature", "forged")
        .header("x-ovh-consumer", "someone-else")
        .header("User-Agent", "caller-agent")
        .user_agent("override-agent")
        .send()
        .await
        .unwrap()
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        header_str(&requests[0], "x-ovh-signature").unwrap(),
        expected_signature(&server, &requests[0], "")
    );
    assert_eq!(header_str(&requests[0], "x-ovh-consumer"), Some("c"));
    assert_eq!(header_str(&requests[0], "user-agent"), Some("override-agent"));
}

#[tokio::test]
async fn test_retry_succeeds_within_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(invalid_json())
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.get("/me").retries(3).send().await.unwrap();

    let response = response.expect("third attempt should succeed");
    assert_eq!(response.body.as_json(), Some(&json!({"ok": true})));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_retry_exhaustion_yields_no_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(invalid_json())
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.get("/me").retries(2).send().await.unwrap();

    assert!(response.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_every_retry_is_signed_again() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/1.0/ip/192.0.2.1"))
        .respond_with(invalid_json())
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/1.0/ip/192.0.2.1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.delete("/ip/192.0.2.1").send().await.unwrap().unwrap();
    assert!(response.body.is_empty());

    let requests = server.received_requests().await.unwrap();
    let timestamps: Vec<&str> = requests
        .iter()
        .map(|request| header_str(request, "x-ovh-timestamp").unwrap())
        .collect();
    assert_eq!(timestamps, vec!["1700000000", "1700000001", "1700000002"]);

    for request in &requests {
        assert_eq!(
            header_str(request, "x-ovh-signature").unwrap(),
            expected_signature(&server, request, "")
        );
    }
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/vps"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.0/vps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["vps-1"])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.vps().list().await.unwrap().unwrap();
    assert_eq!(response.body.as_json(), Some(&json!(["vps-1"])));
}

#[tokio::test]
async fn test_http_errors_are_returned_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "class": "Client::BadRequest",
            "errorCode": "INVALID_SIGNATURE",
            "message": "Invalid signature"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.0/vps"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);

    let response = client.get("/me").retries(3).send().await.unwrap().unwrap();
    assert_eq!(response.status.as_u16(), 400);
    let api_error = response.api_error().unwrap();
    assert!(api_error.is_invalid_signature());

    let response = client.get("/vps").retries(3).send().await.unwrap().unwrap();
    assert_eq!(response.status.as_u16(), 503);
    assert_eq!(response.body.as_text(), Some("Service Unavailable"));

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_transient_failures_are_not_retried() {
    let server = MockServer::start().await;
    let client = build_client(&server);

    let result = client.request(Method::TRACE, "/me").send().await;
    assert!(matches!(result, Err(OvhError::UnsupportedMethod(_))));

    let result = client.get("/me").header("bad header", "x").send().await;
    assert!(matches!(result, Err(OvhError::InvalidHeader(_))));

    let anonymous = OvhClient::new(
        Configuration::builder()
            .api_host(server.uri())
            .build()
            .unwrap(),
    )
    .unwrap();
    let result = anonymous.get("/me").send().await;
    assert!(matches!(result, Err(OvhError::MissingCredentials(_))));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    init_tracing();
    let address = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = OvhClient::builder(configuration(format!("http://{address}")))
        .retry_bounds(Duration::from_millis(1), Duration::from_millis(5))
        .build()
        .unwrap();

    let response = client.get("/me").retries(2).send().await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_dns_failure_is_not_retried() {
    init_tracing();
    let backoff = Duration::from_secs(5);
    let client = OvhClient::builder(configuration("http://does-not-exist.invalid"))
        .retry_bounds(backoff, backoff)
        .build()
        .unwrap();

    let started = Instant::now();
    let result = client.get("/me").retries(3).send().await;

    match result {
        Err(error) => assert!(!error.is_transient(), "unexpected transient error: {error}"),
        Ok(response) => panic!("expected a resolution failure, got {response:?}"),
    }
    assert!(started.elapsed() < backoff);
}

#[tokio::test]
async fn test_text_and_empty_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = build_client(&server);

    let response = client.get("/ping").send().await.unwrap().unwrap();
    assert_eq!(response.body, ResponseBody::Text("pong".to_string()));

    let response = client
        .put("/me")
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .unwrap();
    assert!(response.body.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[1].body.is_empty());
    assert!(header_str(&requests[1], "content-type").is_none());
}

#[tokio::test]
async fn test_concurrent_calls_share_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(8)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.me().get().await }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(response.unwrap().is_success());
    }

    let requests = server.received_requests().await.unwrap();
    let mut timestamps: Vec<&str> = requests
        .iter()
        .map(|request| header_str(request, "x-ovh-timestamp").unwrap())
        .collect();
    timestamps.sort();
    timestamps.dedup();
    assert_eq!(timestamps.len(), 8);
}

#[tokio::test]
async fn test_verbose_logging_does_not_alter_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.0/vps/vps-1/reboot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "todo"})))
        .expect(1)
        .mount(&server)
        .await;

    init_tracing();
    let configuration = Configuration::builder()
        .application_key("ak")
        .application_secret("s")
        .consumer_key("c")
        .api_host(server.uri())
        .verbose(true)
        .build()
        .unwrap();
    let client = OvhClient::new(configuration).unwrap();

    let response = client.vps().reboot("vps-1").await.unwrap().unwrap();
    assert_eq!(response.body.as_json(), Some(&json!({"state": "todo"})));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        header_str(&requests[0], "x-ovh-signature").unwrap(),
        expected_signature(&server, &requests[0], "")
    );
}

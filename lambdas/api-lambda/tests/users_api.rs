use std::net::SocketAddr;
use std::sync::Arc;

use rollcall_api_lambda::local;
use rollcall_shared::{AppState, Config};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: data_dir.path().to_path_buf(),
            ..Config::default()
        };
        let state = Arc::new(AppState::new(&config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(local::serve(listener, state, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            _data_dir: data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[tokio::test]
async fn create_fetch_and_miss() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/api/v1/users"))
        .json(&json!({"name": "John Doe", "email": "john@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["status"], "success");
    assert_eq!(created["data"]["name"], "John Doe");
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let resp = client
        .get(server.url(&format!("/api/v1/users/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["data"], created["data"]);

    let resp = client
        .get(server.url("/api/v1/users/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let missing: Value = resp.json().await.unwrap();
    assert_eq!(missing["status"], "error");
    assert!(missing.get("data").is_none());
}

#[tokio::test]
async fn invalid_body_is_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/api/v1/users"))
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid request body");

    let list: Value = client
        .get(server.url("/api/v1/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn concurrent_creates_over_http() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            let url = server.url("/api/v1/users");
            tokio::spawn(async move {
                let resp = client
                    .post(url)
                    .json(&json!({"name": format!("user-{}", i), "email": "x@x.com"}))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(resp.status(), 201);
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let list: Value = client
        .get(server.url("/api/v1/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let users = list["data"].as_array().unwrap();
    let ids: std::collections::HashSet<&str> =
        users.iter().map(|u| u["id"].as_str().unwrap()).collect();
    assert_eq!(users.len(), 20);
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn health_reports_uptime() {
    let server = TestServer::start().await;

    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let uptime = body["data"]["uptime"].as_str().unwrap();
    let secs: f64 = uptime.trim_end_matches('s').parse().unwrap();
    assert!(secs >= 0.0);
}

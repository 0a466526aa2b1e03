use std::collections::HashMap;
use std::net::SocketAddr;

use referral::{AppState, Category, Classifier, Prediction};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        referral::init_logger();
        let classifier = Classifier::with_builtin_corpus().expect("Failed to create classifier");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(referral::serve(listener, AppState::new(classifier), async move {
            let _ = rx.await;
        }));
        Self {
            addr,
            shutdown: Some(tx),
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

async fn post_json(server: &TestServer, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(server.url("/predict"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_predict_returns_all_categories() {
    let server = TestServer::start().await;
    let (status, body) = post_json(&server, json!({ "text": "Where can I find free food" })).await;

    assert_eq!(status, 200);
    assert_eq!(body["category"], "FOOD_BANK");
    let probabilities: HashMap<String, f64> =
        serde_json::from_value(body["probabilities"].clone()).unwrap();
    assert_eq!(probabilities.len(), Category::COUNT);
    for category in Category::ALL {
        assert!(probabilities.contains_key(category.as_str()));
    }
    let total: f64 = probabilities.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_shelter_query() {
    let server = TestServer::start().await;
    let (status, body) = post_json(&server, json!({ "text": "Night shelter for families" })).await;
    assert_eq!(status, 200);
    let prediction: Prediction = serde_json::from_value(body).unwrap();
    assert_eq!(prediction.category, Category::Shelter);
    assert_eq!(prediction.probabilities.len(), Category::COUNT);
    let shelter = prediction.probability(Category::Shelter);
    assert!(prediction.probabilities.values().all(|&p| p <= shelter));
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let server = TestServer::start().await;
    for body in [json!({ "text": "" }), json!({}), json!({ "text": null })] {
        let (status, response) = post_json(&server, body).await;
        assert_eq!(status, 400);
        assert_eq!(response, json!({ "error": "No text provided" }));
    }
}

#[tokio::test]
async fn test_whitespace_text_is_classified() {
    let server = TestServer::start().await;
    let (status, body) = post_json(&server, json!({ "text": "   " })).await;
    assert_eq!(status, 200);
    assert_eq!(body["probabilities"].as_object().unwrap().len(), Category::COUNT);
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/predict"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let (status, _) = post_json(&server, json!({ "text": 42 })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_server_keeps_serving_after_errors() {
    let server = TestServer::start().await;
    let (status, _) = post_json(&server, json!({ "text": "" })).await;
    assert_eq!(status, 400);
    let (status, body) = post_json(&server, json!({ "text": "asdkfjalksdjf" })).await;
    assert_eq!(status, 200);
    let probabilities = body["probabilities"].as_object().unwrap();
    assert!(probabilities
        .values()
        .all(|p| p.as_f64().map_or(false, |p| p > 0.0 && p < 1.0)));
}

#[tokio::test]
async fn test_health_and_categories() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let categories: Vec<String> = client
        .get(server.url("/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        categories,
        vec![
            "FOOD_BANK",
            "SHELTER",
            "MEDICAL",
            "EDUCATION",
            "RECREATION",
            "COMMUNITY_CENTER",
            "OTHER",
        ]
    );
}

#[tokio::test]
async fn test_cors_headers_present() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/predict"))
        .header("origin", "http://localhost:3000")
        .json(&json!({ "text": "dental clinics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().contains_key("access-control-allow-origin"));
}

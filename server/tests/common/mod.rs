//! Shared helpers for HTTP API tests.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signer, SigningKey};
use scrapbook_auth::SignedTokenVerifier;
use scrapbook_server::{AppState, build_router};
use scrapbook_storage::Database;
use scrapbook_types::UserId;
use serde_json::{Value, json};
use std::sync::Arc;

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

/// A signed token for `user`, valid for an hour.
pub fn token_for(user: &UserId) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    sign(&signing_key(), &json!({
        "sub": user.to_string(),
        "email": format!("{user}@example.com"),
        "iat": now,
        "exp": now + 3600,
    }))
}

pub fn sign(key: &SigningKey, payload: &Value) -> String {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    let signature = key.sign(payload_b64.as_bytes());
    format!("{payload_b64}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

pub struct TestServer {
    pub base: String,
    pub db: Database,
    client: reqwest::Client,
}

/// Spin up the HTTP server on an OS-assigned port over an in-memory database.
pub async fn spawn_test_server() -> TestServer {
    let db = Database::open_in_memory().unwrap();
    let verifier = SignedTokenVerifier::new(signing_key().verifying_key());
    let app = build_router(AppState::new(db.clone(), Arc::new(verifier)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base: format!("http://127.0.0.1:{port}"),
        db,
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base)
    }

    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        user: &UserId,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut req = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token_for(user));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.unwrap();
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str, user: &UserId) -> (u16, Value) {
        self.send(reqwest::Method::GET, path, user, None).await
    }

    pub async fn post(&self, path: &str, user: &UserId, body: Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, user, Some(body)).await
    }

    pub async fn put(&self, path: &str, user: &UserId, body: Value) -> (u16, Value) {
        self.send(reqwest::Method::PUT, path, user, Some(body)).await
    }

    pub async fn patch(&self, path: &str, user: &UserId, body: Value) -> (u16, Value) {
        self.send(reqwest::Method::PATCH, path, user, Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: &UserId) -> (u16, Value) {
        self.send(reqwest::Method::DELETE, path, user, None).await
    }

    /// Creates a scrapbook with one page and returns `(scrapbook_id, page_id)`.
    pub async fn scrapbook_with_page(&self, owner: &UserId, private: bool) -> (String, String) {
        let (status, body) = self
            .post(
                "/scrapbooks",
                owner,
                json!({ "title": "Road trip", "themeCategory": "travel", "isPrivate": private }),
            )
            .await;
        assert_eq!(status, 201, "{body}");
        let scrapbook = body["scrapbook"]["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .post(&format!("/scrapbooks/{scrapbook}/pages"), owner, json!({ "pageOrder": 0 }))
            .await;
        assert_eq!(status, 201, "{body}");
        let page = body["page"]["id"].as_str().unwrap().to_string();
        (scrapbook, page)
    }
}

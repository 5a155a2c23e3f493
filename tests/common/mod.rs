// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use minilink::{config::Config, db::MemoryStore, routes, state::AppState};
use serde_json::{Value, json};

pub struct TestUser {
    pub id: String,
    pub name: String,
    pub token: String,
}

/// Spawns the app on a random port with a fresh in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let config = Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
    };

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a user named `name` and returns its id and token.
pub async fn register(client: &reqwest::Client, address: &str, name: &str) -> TestUser {
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    TestUser {
        id: body["id"].as_str().expect("id missing").to_string(),
        name: name.to_string(),
        token: body["token"].as_str().expect("token missing").to_string(),
    }
}

pub async fn create_post(
    client: &reqwest::Client,
    address: &str,
    user: &TestUser,
    content: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/api/posts", address))
        .bearer_auth(&user.token)
        .json(&json!({ "content": content }))
        .send()
        .await
        .expect("Failed to execute request")
}

// tests/api_tests.rs

mod common;

use common::{create_post, register, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn health_check_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn post_lifecycle_scenario() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let bob = register(&client, &address, "Bob").await;
    let carol = register(&client, &address, "Carol").await;

    // 1. Alice posts
    let response = create_post(&client, &address, &alice, "hello").await;
    assert_eq!(response.status().as_u16(), 201);
    let post: Value = response.json().await.unwrap();
    let post_id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["content"], "hello");
    assert_eq!(post["likes"], json!([]));
    assert_eq!(post["author"]["name"], "Alice");
    assert_eq!(post["author"]["email"], "alice@example.com");
    assert!(post["author"].get("password").is_none());

    // 2. Bob likes
    let response = client
        .put(format!("{}/api/posts/like/{}", address, post_id))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([bob.id]));

    // 3. Bob likes again
    let response = client
        .put(format!("{}/api/posts/like/{}", address, post_id))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Post already liked");

    let current: Value = client
        .get(format!("{}/api/posts/{}", address, post_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["likes"], json!([bob.id]));

    // 4. Bob unlikes
    let response = client
        .put(format!("{}/api/posts/unlike/{}", address, post_id))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));

    // 5. Carol tries to delete
    let response = client
        .delete(format!("{}/api/posts/{}", address, post_id))
        .bearer_auth(&carol.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let still_there = client
        .get(format!("{}/api/posts/{}", address, post_id))
        .send()
        .await
        .unwrap();
    assert_eq!(still_there.status().as_u16(), 200);

    // 6. Alice deletes
    let response = client
        .delete(format!("{}/api/posts/{}", address, post_id))
        .bearer_auth(&alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Post removed");

    let gone = client
        .get(format!("{}/api/posts/{}", address, post_id))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn unlike_without_like_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;

    let post: Value = create_post(&client, &address, &alice, "hello")
        .await
        .json()
        .await
        .unwrap();

    let response = client
        .put(format!("{}/api/posts/unlike/{}", address, post["id"].as_str().unwrap()))
        .bearer_auth(&alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Post has not yet been liked");
}

#[tokio::test]
async fn mutating_routes_require_a_valid_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let post: Value = create_post(&client, &address, &alice, "hello")
        .await
        .json()
        .await
        .unwrap();
    let post_id = post["id"].as_str().unwrap();

    let no_token = client
        .post(format!("{}/api/posts", address))
        .json(&json!({ "content": "sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status().as_u16(), 401);

    let bad_token = client
        .put(format!("{}/api/posts/like/{}", address, post_id))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_token.status().as_u16(), 401);

    let delete = client
        .delete(format!("{}/api/posts/{}", address, post_id))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 401);

    let posts: Vec<Value> = client
        .get(format!("{}/api/posts", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["likes"], json!([]));
}

#[tokio::test]
async fn content_is_trimmed_and_length_checked() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;

    let too_long = "x".repeat(1001);
    for bad in ["", "    \n\t", too_long.as_str()] {
        let response = create_post(&client, &address, &alice, bad).await;
        assert_eq!(response.status().as_u16(), 400, "content {:?}", bad.len());
        let body: Value = response.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().contains("1000"));
    }

    let missing_field = client
        .post(format!("{}/api/posts", address))
        .bearer_auth(&alice.token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_field.status().as_u16(), 400);

    let response = create_post(&client, &address, &alice, &format!("  {}  ", "y".repeat(1000))).await;
    assert_eq!(response.status().as_u16(), 201);
    let post: Value = response.json().await.unwrap();
    assert_eq!(post["content"].as_str().unwrap().len(), 1000);

    let posts: Vec<Value> = client
        .get(format!("{}/api/posts", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let url = format!("{}/api/posts", address);

    let wrong_type = client
        .post(&url)
        .bearer_auth(&alice.token)
        .json(&json!({ "content": 123 }))
        .send()
        .await
        .unwrap();
    let not_json = client
        .post(&url)
        .bearer_auth(&alice.token)
        .body(r#"{"content":"hello"}"#)
        .send()
        .await
        .unwrap();
    let broken = client
        .post(&url)
        .bearer_auth(&alice.token)
        .header("content-type", "application/json")
        .body("{\"content\":")
        .send()
        .await
        .unwrap();

    for response in [wrong_type, not_json, broken] {
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "email": ["alice@example.com"], "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 400);

    let posts: Vec<Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn listings_are_newest_first_and_filter_by_author() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let bob = register(&client, &address, "Bob").await;

    for (user, text) in [(&alice, "a1"), (&bob, "b1"), (&alice, "a2"), (&bob, "b2")] {
        assert_eq!(create_post(&client, &address, user, text).await.status().as_u16(), 201);
    }

    let all: Vec<Value> = client
        .get(format!("{}/api/posts", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let contents: Vec<&str> = all.iter().map(|p| p["content"].as_str().unwrap()).collect();
    assert_eq!(contents, ["b2", "a2", "b1", "a1"]);
    let stamps: Vec<chrono::DateTime<chrono::Utc>> = all
        .iter()
        .map(|p| p["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));

    let by_alice: Vec<Value> = client
        .get(format!("{}/api/posts/user/{}", address, alice.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let contents: Vec<&str> = by_alice.iter().map(|p| p["content"].as_str().unwrap()).collect();
    assert_eq!(contents, ["a2", "a1"]);
    assert!(by_alice.iter().all(|p| p["author"]["name"] == "Alice"));

    let response = client
        .get(format!("{}/api/posts/user/not-a-user-id", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn unknown_posts_are_not_found() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let missing = uuid::Uuid::new_v4();

    for path in [
        format!("like/{}", missing),
        format!("unlike/{}", missing),
        "like/garbage".to_string(),
    ] {
        let response = client
            .put(format!("{}/api/posts/{}", address, path))
            .bearer_auth(&alice.token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404, "{}", path);
    }

    let response = client
        .delete(format!("{}/api/posts/{}", address, missing))
        .bearer_auth(&alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn concurrent_likes_by_one_user_count_once() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let alice = register(&client, &address, "Alice").await;
    let bob = register(&client, &address, "Bob").await;
    let post: Value = create_post(&client, &address, &alice, "race me")
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}/api/posts/like/{}", address, post["id"].as_str().unwrap());

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = url.clone();
        let token = bob.token.clone();
        tokio::spawn(async move {
            client
                .put(url)
                .bearer_auth(token)
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        })
    });

    let mut statuses = Vec::new();
    for handle in requests.collect::<Vec<_>>() {
        statuses.push(handle.await.unwrap());
    }
    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 400).count(), 7);
}

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use charachat::domain::config::{ApiConfig, KdfConfig};
use charachat::features::characters::Character;
use charachat::vault::is_sealed;
use charachat_server::Server;
use serde_json::{Value, json};
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

async fn server() -> Server {
    let mut cfg = ApiConfig::default();
    cfg.security.kdf = KdfConfig { memory_kib: 256, iterations: 1, parallelism: 1 };
    Server::builder().config(cfg).build().await.expect("server builds")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    Reply { status, set_cookie, body }
}

/// Logs in and returns the `key=<hex>` pair for the `Cookie` header.
async fn login(app: &Router, email: &str, password: &str) -> String {
    let reply = send(
        app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

    let set_cookie = reply.set_cookie.expect("key cookie");
    set_cookie.split(';').next().unwrap().to_owned()
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = server().await.router();

    let reply = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "up");

    let reply = send(&app, Method::GET, "/health/ready", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["database"], "up");

    let reply = send(&app, Method::GET, "/api", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn login_issues_the_key_cookie_and_logout_clears_it() {
    let app = server().await.router();

    let reply = send(
        &app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "email": "aria@example.com", "password": "lighthouse" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["created"], true);
    let cookie = reply.set_cookie.unwrap();
    assert!(cookie.starts_with("key="));
    for attribute in ["HttpOnly", "Secure", "SameSite=Strict", "Path=/", "Max-Age=31536000"] {
        assert!(cookie.contains(attribute), "{attribute} missing from {cookie}");
    }
    let pair = cookie.split(';').next().unwrap();

    let status = send(&app, Method::GET, "/api/session", Some(pair), None).await;
    assert_eq!(status.body["authenticated"], true);
    assert_eq!(status.body["ownerId"], reply.body["ownerId"]);

    let anonymous = send(&app, Method::GET, "/api/session", None, None).await;
    assert_eq!(anonymous.body["authenticated"], false);
    assert_eq!(anonymous.body["ownerId"], Value::Null);

    let logout = send(&app, Method::DELETE, "/api/session", Some(pair), None).await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    assert!(logout.set_cookie.unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = server().await.router();
    login(&app, "bob@example.com", "correct horse").await;

    let reply = send(
        &app,
        Method::POST,
        "/api/session",
        None,
        Some(json!({ "email": "bob@example.com", "password": "battery staple" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "InvalidCredentials");
    assert!(reply.set_cookie.is_none());
}

#[tokio::test]
async fn private_character_round_trip_over_http() {
    let server = server().await;
    let app = server.router();
    let aria = login(&app, "aria@example.com", "lighthouse").await;

    let created = send(
        &app,
        Method::POST,
        "/api/characters",
        Some(&aria),
        Some(json!({ "name": "Aria", "firstMessage": "You're late.", "isPrivate": true })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["name"], "Aria");
    let id = created.body["id"].as_str().unwrap().to_owned();

    let stored = server
        .state()
        .database
        .table::<Character>("character")
        .fetch(&id)
        .await
        .unwrap()
        .unwrap();
    assert!(is_sealed(&stored.name));
    assert!(is_sealed(&stored.first_message));

    let fetched = send(&app, Method::GET, &format!("/api/characters/{id}"), Some(&aria), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Aria");

    let stranger = send(&app, Method::GET, &format!("/api/characters/{id}"), None, None).await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let bob = login(&app, "bob@example.com", "hunter2").await;
    let other = send(&app, Method::GET, &format!("/api/characters/{id}"), Some(&bob), None).await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);

    let deleted = send(&app, Method::DELETE, &format!("/api/characters/{id}"), Some(&aria), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn public_character_is_listed_for_everyone() {
    let app = server().await.router();
    let bob = login(&app, "bob@example.com", "hunter2").await;

    let created = send(
        &app,
        Method::POST,
        "/api/characters",
        Some(&bob),
        Some(json!({ "name": "Bob", "isPrivate": false })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_owned();

    let listed = send(&app, Method::GET, "/api/characters", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["name"], "Bob");

    let aria = login(&app, "aria@example.com", "lighthouse").await;
    let hijack = send(
        &app,
        Method::PUT,
        &format!("/api/characters/{id}"),
        Some(&aria),
        Some(json!({ "name": "Not Bob" })),
    )
    .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);
    assert_eq!(hijack.body["error"], "Forbidden");
}

#[tokio::test]
async fn writes_without_a_session_are_unauthorized() {
    let app = server().await.router();

    let reply = send(&app, Method::POST, "/api/stories", None, Some(json!({ "title": "Untold" }))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "MissingKey");

    let reply = send(&app, Method::POST, "/api/personas/migrate", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let garbage = send(&app, Method::GET, "/api/session", Some("key=not-hex"), None).await;
    assert_eq!(garbage.body["authenticated"], false);
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let app = server().await.router();
    let reply = send(&app, Method::GET, "/api/tags/not-an-id", None, None).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["error"], "Validation");
}

#[tokio::test]
async fn chat_messages_over_http() {
    let app = server().await.router();
    let aria = login(&app, "aria@example.com", "lighthouse").await;

    let chat = send(
        &app,
        Method::POST,
        "/api/chats",
        Some(&aria),
        Some(json!({ "characterId": "Uakgb4J7fX2m" })),
    )
    .await;
    assert_eq!(chat.status, StatusCode::CREATED, "{}", chat.body);
    let id = chat.body["id"].as_str().unwrap().to_owned();
    let messages = format!("/api/chats/{id}/messages");

    let posted =
        send(&app, Method::POST, &messages, Some(&aria), Some(json!({ "content": "Hello?" }))).await;
    assert_eq!(posted.status, StatusCode::CREATED, "{}", posted.body);
    assert_eq!(posted.body["chatId"], id.as_str());

    let listed = send(&app, Method::GET, &messages, Some(&aria), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body[0]["content"], "Hello?");

    let chat = send(&app, Method::GET, &format!("/api/chats/{id}"), Some(&aria), None).await;
    assert_eq!(chat.body["lastMessage"], "Hello?");

    let sweep = send(&app, Method::POST, "/api/chats/migrate", Some(&aria), None).await;
    assert_eq!(sweep.status, StatusCode::OK);
    assert_eq!(sweep.body["kind"], "chat");
    assert_eq!(sweep.body["scanned"], 1);
    assert_eq!(sweep.body["healed"], 0);
}

#[tokio::test]
async fn generic_message_writes_are_checked_against_the_chat() {
    let app = server().await.router();
    let aria = login(&app, "aria@example.com", "lighthouse").await;
    let bob = login(&app, "bob@example.com", "harbour").await;

    let chat = send(&app, Method::POST, "/api/chats", Some(&aria), Some(json!({ "characterId": "Uakgb4J7fX2m" })))
        .await;
    let id = chat.body["id"].as_str().unwrap().to_owned();

    let foreign =
        send(&app, Method::POST, "/api/messages", Some(&bob), Some(json!({ "chatId": id, "content": "hi" }))).await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND, "{}", foreign.body);

    let blank =
        send(&app, Method::POST, "/api/messages", Some(&aria), Some(json!({ "chatId": id, "content": " " }))).await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(blank.body["error"], "Validation");

    let posted =
        send(&app, Method::POST, "/api/messages", Some(&aria), Some(json!({ "chatId": id, "content": "Hello?" })))
            .await;
    assert_eq!(posted.status, StatusCode::CREATED, "{}", posted.body);
    assert_eq!(posted.body["role"], "user");
    let message = format!("/api/messages/{}", posted.body["id"].as_str().unwrap());

    let renamed = send(
        &app,
        Method::PUT,
        &message,
        Some(&aria),
        Some(json!({ "role": "oracle", "content": "Hello?" })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::UNPROCESSABLE_ENTITY);

    let edited = send(&app, Method::PUT, &message, Some(&aria), Some(json!({ "content": "Hello!" }))).await;
    assert_eq!(edited.status, StatusCode::OK, "{}", edited.body);
    assert_eq!(edited.body["chatId"], id.as_str());

    let chat = send(&app, Method::GET, &format!("/api/chats/{id}"), Some(&aria), None).await;
    assert_eq!(chat.body["lastMessage"], "Hello!");

    let removed = send(&app, Method::DELETE, &message, Some(&aria), None).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
}

//! HTTP-level tests for the registry routes.
//!
//! Each test builds a fresh router over an in-memory database and drives it
//! with `oneshot`.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use kinship::config::RouteConfig;
use kinship::server::{router, AppState};
use kinship::Registry;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    AppState::new(Registry::open_in_memory().unwrap())
}

fn app(state: &Arc<AppState>) -> Router {
    router(state.clone(), &RouteConfig::default()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send_request(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Failed to parse response: {} - Body: {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

async fn create_person(state: &Arc<AppState>, identifier: &str, name: &str) -> (StatusCode, Value) {
    send_request(
        app(state),
        post_json_request("/person", json!({ "identifier": identifier, "name": name })),
    )
    .await
}

#[tokio::test]
async fn test_create_and_get_person() {
    let state = test_state();

    let (status, body) = create_person(&state, "12345678901", "Alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Person success created."));

    let (status, body) = send_request(app(&state), get_request("/person/12345678901")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["identifier"], "12345678901");
    assert_eq!(body["person"]["name"], "Alice");
    assert!(body["person"]["createdAt"].is_string());
    assert!(body["person"]["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_person_invalid_identifier() {
    let state = test_state();

    let (status, body) = create_person(&state, "123456789012", "Alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("CPF number invalid."));
}

#[tokio::test]
async fn test_create_person_duplicate() {
    let state = test_state();

    create_person(&state, "111", "Alice").await;
    let (status, body) = create_person(&state, "111", "Bob").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Person exists."));

    let stats = state.registry.lock().await.stats().unwrap();
    assert_eq!(stats.persons, 1);
}

#[tokio::test]
async fn test_create_person_blank_name() {
    let state = test_state();

    let (status, body) = send_request(
        app(&state),
        post_json_request("/person", json!({ "identifier": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Name invalid."));
}

#[tokio::test]
async fn test_create_person_accepts_cpf_field() {
    let state = test_state();

    let (status, _) = send_request(
        app(&state),
        post_json_request("/person", json!({ "cpf": "111", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(app(&state), get_request("/person/111")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_missing_person() {
    let state = test_state();

    let (status, body) = send_request(app(&state), get_request("/person/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("Person not exists."));
}

#[tokio::test]
async fn test_relationship_missing_participant() {
    let state = test_state();
    create_person(&state, "111", "Alice").await;

    let (status, body) = send_request(
        app(&state),
        post_json_request("/relationship", json!({ "participantA": "111", "participantB": "222" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("CPF 222 not exists"));

    let (status, body) = send_request(
        app(&state),
        post_json_request("/relationship", json!({ "participantA": "333", "participantB": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("CPF 333 not exists"));

    // no length check here, an over-long identifier is just unknown
    let (status, body) = send_request(
        app(&state),
        post_json_request(
            "/relationship",
            json!({ "participantA": "111", "participantB": "123456789012" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("CPF 123456789012 not exists"));
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let state = test_state();

    let (status, body) = send_request(
        app(&state),
        post_json_request("/person", json!({ "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().starts_with("Invalid request body"));

    let (status, body) = send_request(
        app(&state),
        post_json_request("/relationship", json!({ "participantA": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().starts_with("Invalid request body"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/person")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_request(app(&state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/person")
        .body(Body::from(r#"{"identifier":"111","name":"Alice"}"#))
        .unwrap();
    let (status, body) = send_request(app(&state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_string());

    assert_eq!(state.registry.lock().await.stats().unwrap().persons, 0);
}

#[tokio::test]
async fn test_recommendation_scenario() {
    let state = test_state();
    create_person(&state, "12345678901", "Alice").await;
    create_person(&state, "10987654321", "Bob").await;

    let (status, body) = send_request(
        app(&state),
        post_json_request(
            "/relationship",
            json!({ "participantA": "12345678901", "participantB": "10987654321" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Relationship success created."));

    let expected = json!({ "participantA": "12345678901", "participantB": "10987654321" });

    let (status, body) = send_request(app(&state), get_request("/recommendations/12345678901")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);

    let (status, body) = send_request(app(&state), get_request("/recommendations/10987654321")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_relationship_accepts_cpf_fields() {
    let state = test_state();
    create_person(&state, "111", "Alice").await;
    create_person(&state, "222", "Bob").await;

    let (status, _) = send_request(
        app(&state),
        post_json_request("/relationship", json!({ "cpf1": "111", "cpf2": "222" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_request(app(&state), get_request("/recommendations/222")).await;
    assert_eq!(body, json!({ "participantA": "111", "participantB": "222" }));
}

#[tokio::test]
async fn test_recommendation_errors() {
    let state = test_state();

    let (status, body) = send_request(app(&state), get_request("/recommendations/123456789012")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("CPF 123456789012 number invalid."));

    let (status, body) = send_request(app(&state), get_request("/recommendations/111")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("Person 111 not exists."));

    create_person(&state, "111", "Alice").await;
    let (status, body) = send_request(app(&state), get_request("/recommendations/111")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("Relationship for CPF 111 not exists."));
}

#[tokio::test]
async fn test_clean_removes_everything() {
    let state = test_state();
    create_person(&state, "111", "Alice").await;
    create_person(&state, "222", "Bob").await;
    send_request(
        app(&state),
        post_json_request("/relationship", json!({ "participantA": "111", "participantB": "222" })),
    )
    .await;

    let (status, body) = send_request(app(&state), delete_request("/clean")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Clean success."));

    for id in ["111", "222"] {
        let (status, _) = send_request(app(&state), get_request(&format!("/person/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send_request(app(&state), get_request(&format!("/recommendations/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // a second clean on empty stores still succeeds
    let (status, _) = send_request(app(&state), delete_request("/clean")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_custom_routes() {
    let state = test_state();
    let routes = RouteConfig {
        person_post: "/api/person".to_string(),
        person_get: "/api/person/:cpf".to_string(),
        relationship: "/api/relationship".to_string(),
        clean: "/api/clean".to_string(),
        recommendations: "/api/recommendations/{cpf}".to_string(),
    };
    let app = || router(state.clone(), &routes).unwrap();

    let (status, _) = send_request(
        app(),
        post_json_request("/api/person", json!({ "identifier": "111", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_request(app(), get_request("/api/person/111")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["name"], "Alice");

    let (status, _) = send_request(
        app(),
        post_json_request("/api/relationship", json!({ "participantA": "111", "participantB": "111" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(app(), get_request("/api/recommendations/111")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(app(), delete_request("/api/clean")).await;
    assert_eq!(status, StatusCode::OK);

    // default paths are not served
    let response = app().oneshot(get_request("/person/111")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_conflicting_routes_rejected() {
    let routes = RouteConfig {
        recommendations: "/person/{id}".to_string(),
        ..RouteConfig::default()
    };
    assert!(router(test_state(), &routes).is_err());

    let routes = RouteConfig {
        recommendations: "/person/:cpf".to_string(),
        ..RouteConfig::default()
    };
    assert!(router(test_state(), &routes).is_err());
}

#[tokio::test]
async fn test_shared_path_with_different_param_names() {
    let state = test_state();
    let routes = RouteConfig {
        person_get: "/person/:cpf".to_string(),
        clean: "/person/:id".to_string(),
        ..RouteConfig::default()
    };
    let app = || router(state.clone(), &routes).unwrap();

    send_request(
        app(),
        post_json_request("/person", json!({ "identifier": "111", "name": "Alice" })),
    )
    .await;

    let (status, body) = send_request(app(), get_request("/person/111")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["name"], "Alice");

    let (status, body) = send_request(app(), delete_request("/person/anything")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Clean success."));

    let (status, _) = send_request(app(), get_request("/person/111")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db").join("kinship.db");

    {
        let state = AppState::new(Registry::open(&path).unwrap());
        let (status, _) = create_person(&state, "111", "Alice").await;
        assert_eq!(status, StatusCode::OK);
    }

    let state = AppState::new(Registry::open(&path).unwrap());
    let (status, body) = send_request(app(&state), get_request("/person/111")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["name"], "Alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_creates() {
    let state = test_state();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let state = state.clone();
            tokio::spawn(async move { create_person(&state, "111", &format!("Person {}", i)).await.0 })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => created += 1,
            StatusCode::BAD_REQUEST => {}
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(state.registry.lock().await.stats().unwrap().persons, 1);
}

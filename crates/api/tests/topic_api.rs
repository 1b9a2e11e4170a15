//! HTTP-level integration tests for topic CRUD and node updates.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, get_anonymous, post_json, put_json, token_for};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Import a three-node tree and return the response body.
async fn import_tree(pool: &PgPool, token: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/topics/import",
        token,
        json!({
            "title": "SQL",
            "description": "Relational basics",
            "tree": [
                {"temp_id": "a", "title": "SELECT", "description": "d", "level": 0},
                {"temp_id": "b", "title": "JOIN", "description": "d", "level": 1, "requires": ["a"]},
                {"temp_id": "c", "title": "Indexes", "description": "d", "level": 2, "requires": ["b"]},
            ],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Topic CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_topic_returns_201(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/topics",
        &token,
        json!({"title": "  Python  ", "description": "Scripting", "prompt": "   "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Python");
    assert!(json["prompt"].is_null());
    assert_eq!(json["total_nodes"], 0);
    assert!(json["id"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_topic_with_blank_title_returns_400(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/topics",
        &token,
        json!({"title": "   ", "description": "Scripting"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_topics_is_scoped_to_caller(pool: PgPool) {
    let alice = token_for(Uuid::new_v4());
    let bob = token_for(Uuid::new_v4());
    import_tree(&pool, &alice).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/topics", &alice).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/topics", &bob).await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_topic(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}"),
        &token,
        json!({"title": "Advanced SQL"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Advanced SQL");
    assert_eq!(json["description"], "Relational basics");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_prompt_is_null_on_create_and_update(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/topics",
            &token,
            json!({"title": "Go", "description": "Concurrency", "prompt": "goroutines"}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["prompt"], "goroutines");

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}"),
        &token,
        json!({"prompt": "   "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["prompt"].is_null());
    assert_eq!(json["title"], "Go");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_topic_then_get_returns_404(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/topics/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/topics/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/topics/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_unknown_topic_returns_404(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_test_app(pool);

    let response = get(app, &format!("/api/v1/topics/{}", Uuid::new_v4()), &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_topics_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anonymous(app, "/api/v1/topics").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/topics", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_nodes_orders_by_level(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/topics/{id}/nodes"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["SELECT", "JOIN", "Indexes"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completing_nodes_updates_topic_counter(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();
    let node_id = created["nodes"][0]["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}/nodes/{node_id}/completion"),
        &token,
        json!({"is_completed": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_completed"], true);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/topics/{id}"), &token).await).await;
    assert_eq!(json["topic"]["completed_nodes"], 1);
    assert_eq!(json["topic"]["total_nodes"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_node(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();
    let node = &created["nodes"][1];
    let node_id = node["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}/nodes/{node_id}/position"),
        &token,
        json!({"position_x": 320.0, "position_y": 160.5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["position_x"], 320.0);
    assert_eq!(json["position_y"], 160.5);
    assert_eq!(json["requires"], node["requires"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_node_of_foreign_topic_returns_404(pool: PgPool) {
    let owner = token_for(Uuid::new_v4());
    let stranger = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &owner).await;
    let id = created["topic"]["id"].as_str().unwrap();
    let node_id = created["nodes"][0]["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}/nodes/{node_id}/completion"),
        &stranger,
        json!({"is_completed": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_node_returns_404(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let created = import_tree(&pool, &token).await;
    let id = created["topic"]["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/topics/{id}/nodes/{}/position", Uuid::new_v4()),
        &token,
        json!({"position_x": 1.0, "position_y": 2.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

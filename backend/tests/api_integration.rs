//! Backend API Integration Tests
//!
//! Tests for the Axum HTTP endpoints using Router::oneshot pattern.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend::api;
use chess_core::Session;
use serde_json::{json, Value};
use tower::ServiceExt;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Helper to create a test router backed by a fallback-only session
fn test_router() -> Router {
    api::router(Session::new(None))
}

/// POST a JSON body and decode the JSON reply
async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// POST with no body (reset, takeback)
async fn post_empty(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_move_returns_fen_and_engine_reply() {
    let app = test_router();

    let (status, body) = post_json(app, "/move", json!({"move": "e2e4"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Success");

    // Both plies applied: it is White to move again.
    let fen = body["fen"].as_str().unwrap();
    assert!(fen.contains(" w "));

    let ai_move = body["ai_move"].as_str().unwrap();
    assert!(ai_move.len() == 4 || ai_move.len() == 5);
}

#[tokio::test]
async fn test_malformed_move_is_bad_request() {
    let app = test_router();

    let (status, body) = post_json(app, "/move", json!({"move": "e2e9"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid move format");
}

#[tokio::test]
async fn test_illegal_move_is_bad_request() {
    let app = test_router();

    let (status, body) = post_json(app, "/move", json!({"move": "a2a5"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Illegal move");
}

#[tokio::test]
async fn test_set_difficulty_round_trip() {
    let app = test_router();

    let (status, body) = post_json(app, "/set_difficulty", json!({"difficulty": "easy"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Difficulty set");
    assert_eq!(body["difficulty"], "easy");
}

#[tokio::test]
async fn test_unknown_difficulty_is_rejected() {
    let app = test_router();

    let (status, body) =
        post_json(app, "/set_difficulty", json!({"difficulty": "grandmaster"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid difficulty");
}

#[tokio::test]
async fn test_set_color_black_gets_an_opening_move() {
    let app = test_router();

    let (status, body) = post_json(app, "/set_color", json!({"color": "black"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Color set");
    assert_eq!(body["player_color"], "black");
    assert!(body["ai_move"].is_string());
    assert!(body["fen"].as_str().unwrap().contains(" b "));
}

#[tokio::test]
async fn test_set_color_white_waits_for_the_player() {
    let app = test_router();

    let (status, body) = post_json(app, "/set_color", json!({"color": "white"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player_color"], "white");
    assert!(body["ai_move"].is_null());
    assert_eq!(body["fen"], START_FEN);
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let app = test_router();

    let (status, body) = post_json(app, "/set_color", json!({"color": "purple"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid color");
}

#[tokio::test]
async fn test_reset_returns_the_start_position() {
    let app = test_router();

    let (status, body) = post_empty(app, "/reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Board reset");
    assert_eq!(body["fen"], START_FEN);
    assert!(body["ai_move"].is_null());
}

#[tokio::test]
async fn test_takeback_without_moves_is_rejected() {
    let app = test_router();

    let (status, body) = post_empty(app, "/takeback").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not enough moves to take back");
}

#[tokio::test]
async fn test_takeback_after_an_exchange_restores_the_start() {
    let app = test_router();

    let (status, _) = post_json(app.clone(), "/move", json!({"move": "e2e4"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_empty(app, "/takeback").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Moves taken back");
    assert_eq!(body["fen"], START_FEN);
}

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use chess_core::{parse_color, Difficulty, Session, SessionError};

#[derive(Clone)]
pub struct AppState {
    // Every handler locks the session for its whole operation, engine
    // round-trip included; that lock IS the single-writer discipline.
    session: Arc<Mutex<Session>>,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub uci: String,
}

#[derive(Deserialize)]
pub struct DifficultyRequest {
    pub difficulty: String,
}

#[derive(Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub status: &'static str,
    pub fen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub status: &'static str,
    pub difficulty: String,
}

#[derive(Serialize)]
pub struct ColorResponse {
    pub status: &'static str,
    pub fen: String,
    pub player_color: &'static str,
    pub ai_move: Option<String>,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub fen: String,
    pub ai_move: Option<String>,
}

#[derive(Serialize)]
pub struct TakebackResponse {
    pub status: &'static str,
    pub fen: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Session errors rendered as JSON: validation as 400, engine failure
/// as 500.
pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SessionError::EngineFailure => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(session: Session) -> Router {
    let state = AppState {
        session: Arc::new(Mutex::new(session)),
    };

    Router::new()
        .route("/move", post(submit_move))
        .route("/set_difficulty", post(set_difficulty))
        .route("/set_color", post(set_color))
        .route("/reset", post(reset))
        .route("/takeback", post(takeback))
        .with_state(state)
}

async fn submit_move(
    State(state): State<AppState>,
    Json(payload): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.submit_move(&payload.uci).await?;

    let status = if outcome.result.is_some() {
        "Game Over"
    } else {
        "Success"
    };
    Ok(Json(MoveResponse {
        status,
        fen: outcome.fen,
        ai_move: outcome.engine_move,
        result: outcome.result.map(|r| r.to_string()),
    }))
}

async fn set_difficulty(
    State(state): State<AppState>,
    Json(payload): Json<DifficultyRequest>,
) -> Result<Json<DifficultyResponse>, ApiError> {
    let difficulty: Difficulty = payload.difficulty.parse()?;
    state.session.lock().await.set_difficulty(difficulty);
    Ok(Json(DifficultyResponse {
        status: "Difficulty set",
        difficulty: difficulty.to_string(),
    }))
}

async fn set_color(
    State(state): State<AppState>,
    Json(payload): Json<ColorRequest>,
) -> Result<Json<ColorResponse>, ApiError> {
    let color = parse_color(&payload.color)?;
    let mut session = state.session.lock().await;
    let outcome = session.set_color(color).await;

    Ok(Json(ColorResponse {
        status: "Color set",
        fen: outcome.fen,
        player_color: if color.is_white() { "white" } else { "black" },
        ai_move: outcome.engine_move,
    }))
}

async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.reset().await;

    Json(ResetResponse {
        status: "Board reset",
        fen: outcome.fen,
        ai_move: outcome.engine_move,
    })
}

async fn takeback(State(state): State<AppState>) -> Result<Json<TakebackResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let fen = session.takeback()?;
    info!("[API] takeback accepted");

    Ok(Json(TakebackResponse {
        status: "Moves taken back",
        fen,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_request_deserialization() {
        let json = r#"{"move": "e2e4"}"#;
        let request: MoveRequest = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(request.uci, "e2e4");
    }

    #[test]
    fn test_move_response_omits_absent_fields() {
        let response = MoveResponse {
            status: "Success",
            fen: "fen".to_string(),
            ai_move: Some("e7e5".to_string()),
            result: None,
        };

        let json = serde_json::to_string(&response).expect("Should serialize");
        assert!(json.contains("e7e5"));
        assert!(!json.contains("result"));
    }

    #[test]
    fn test_game_over_response_includes_result() {
        let response = MoveResponse {
            status: "Game Over",
            fen: "fen".to_string(),
            ai_move: None,
            result: Some("Black wins by checkmate!".to_string()),
        };

        let json = serde_json::to_string(&response).expect("Should serialize");
        assert!(json.contains("Game Over"));
        assert!(json.contains("Black wins by checkmate!"));
        assert!(!json.contains("ai_move"));
    }

    #[test]
    fn test_color_response_keeps_null_ai_move() {
        let response = ColorResponse {
            status: "Color set",
            fen: "fen".to_string(),
            player_color: "white",
            ai_move: None,
        };

        let json = serde_json::to_string(&response).expect("Should serialize");
        assert!(json.contains(r#""ai_move":null"#));
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_string(&ErrorBody {
            error: SessionError::IllegalMove.to_string(),
        })
        .expect("Should serialize");
        assert_eq!(json, r#"{"error":"Illegal move"}"#);
    }
}

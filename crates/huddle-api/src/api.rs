//! HTTP API for Huddle boards.

use crate::ws::ws_board_handler;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use huddle_board::{unix_millis, Board, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // Boards
        .route("/api/boards", post(create_board))
        .route("/api/boards/{slug}", get(get_board))
        .route("/api/boards/{slug}/exists", get(board_exists))
        // Cards and votes
        .route("/api/boards/{slug}/cards", post(add_card))
        .route("/api/boards/{slug}/cards/{card_id}/votes", post(vote_card))
        // WebSocket for live board snapshots
        .route("/api/boards/{slug}/ws", get(ws_board_handler))
        .layer(cors)
        .with_state(state)
}

type ApiError = (StatusCode, String);

/// Map a core error onto an HTTP status. Validation failures surface
/// verbatim for inline display.
fn error_status(err: Error) -> ApiError {
    let status = match &err {
        Error::InvalidName => StatusCode::UNPROCESSABLE_ENTITY,
        Error::NameTaken(_) => StatusCode::CONFLICT,
        Error::Serialization(_) | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

async fn health() -> &'static str {
    "OK"
}

// --- Board endpoints ---

#[derive(Debug, Deserialize)]
struct CreateBoardRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateBoardResponse {
    slug: String,
}

async fn create_board(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<CreateBoardResponse>), ApiError> {
    let slug = state
        .registry
        .create_board(req.name.trim())
        .await
        .map_err(error_status)?;
    Ok((StatusCode::CREATED, Json(CreateBoardResponse { slug })))
}

async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Board>, ApiError> {
    match state.registry.get_board(&slug).await {
        Ok(Some(board)) => Ok(Json(board)),
        Ok(None) => Err((StatusCode::NOT_FOUND, format!("no board {:?}", slug))),
        Err(err) => Err(error_status(err)),
    }
}

#[derive(Debug, Serialize)]
struct ExistsResponse {
    exists: bool,
}

async fn board_exists(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let exists = state
        .registry
        .board_exists(&slug)
        .await
        .map_err(error_status)?;
    Ok(Json(ExistsResponse { exists }))
}

// --- Card endpoints ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCardRequest {
    text: String,
    author: String,
    column_index: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddCardResponse {
    card_id: String,
}

async fn add_card(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(req): Json<AddCardRequest>,
) -> Result<(StatusCode, Json<AddCardResponse>), ApiError> {
    // The ledger treats non-empty text as a precondition; this layer owns it.
    let text = req.text.trim();
    if text.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "card text is empty".to_string(),
        ));
    }

    let board = match state.registry.get_board(&slug).await {
        Ok(Some(board)) => board,
        Ok(None) => return Err((StatusCode::NOT_FOUND, format!("no board {:?}", slug))),
        Err(err) => return Err(error_status(err)),
    };
    if req.column_index as usize >= board.columns.len() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("column index {} out of range", req.column_index),
        ));
    }

    let author = req.author.trim();
    let author = if author.is_empty() { "Anonymous" } else { author };

    let card_id = state
        .ledger
        .add_card(&slug, req.column_index, text, author, unix_millis())
        .await
        .map_err(error_status)?;
    Ok((StatusCode::CREATED, Json(AddCardResponse { card_id })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct VoteResponse {
    /// False when the session already voted or the card is gone.
    voted: bool,
}

async fn vote_card(
    State(state): State<Arc<AppState>>,
    Path((slug, card_id)): Path<(String, String)>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let voted = state
        .ledger
        .vote_card(&slug, &card_id, &req.session_id)
        .await
        .map_err(error_status)?;
    Ok(Json(VoteResponse { voted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_store::MemoryStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn router_builds() {
        let _router = build_router(state());
    }

    #[test]
    fn validation_errors_map_to_client_statuses() {
        assert_eq!(
            error_status(Error::InvalidName).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(Error::NameTaken("sprint-1".into())).0,
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn create_board_handler_roundtrip() {
        let state = state();

        let (status, Json(created)) = create_board(
            State(state.clone()),
            Json(CreateBoardRequest {
                name: "Sprint 1".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.slug, "sprint-1");

        // Colliding name comes back as a conflict.
        let err = create_board(
            State(state),
            Json(CreateBoardRequest {
                name: "sprint 1".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn add_card_checks_text_and_column() {
        let state = state();
        state.registry.create_board("Sprint 1").await.unwrap();

        let err = add_card(
            State(state.clone()),
            Path("sprint-1".into()),
            Json(AddCardRequest {
                text: "   ".into(),
                author: "Ann".into(),
                column_index: 0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let err = add_card(
            State(state.clone()),
            Path("sprint-1".into()),
            Json(AddCardRequest {
                text: "Ship it".into(),
                author: "Ann".into(),
                column_index: 9,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, Json(resp)) = add_card(
            State(state),
            Path("sprint-1".into()),
            Json(AddCardRequest {
                text: "  Ship it  ".into(),
                author: "".into(),
                column_index: 0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(!resp.card_id.is_empty());
    }

    #[tokio::test]
    async fn vote_handler_reports_dedup() {
        let state = state();
        state.registry.create_board("Sprint 1").await.unwrap();
        let card_id = state
            .ledger
            .add_card("sprint-1", 0, "Ship it", "Ann", 1)
            .await
            .unwrap();

        let Json(first) = vote_card(
            State(state.clone()),
            Path(("sprint-1".into(), card_id.clone())),
            Json(VoteRequest {
                session_id: "s1".into(),
            }),
        )
        .await
        .unwrap();
        assert!(first.voted);

        let Json(second) = vote_card(
            State(state),
            Path(("sprint-1".into(), card_id)),
            Json(VoteRequest {
                session_id: "s1".into(),
            }),
        )
        .await
        .unwrap();
        assert!(!second.voted);
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::Principal;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{stub_reply, ChatRequest};
use super::repo::{self, Chat};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(send_message).get(history))
}

#[instrument(skip(state, payload))]
async fn send_message(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<ChatRequest>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    if payload.input_content.trim().is_empty() {
        return Err(AppError::Validation("input_content is required".into()));
    }
    let reply = stub_reply(&payload.input_content);
    let exchange = repo::insert(
        &state.db,
        principal.id,
        &payload.input_type,
        &payload.input_content,
        "text",
        &reply,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(exchange)))
}

#[instrument(skip(state))]
async fn history(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Chat>>, AppError> {
    Ok(Json(repo::list_for_user(&state.db, principal.id).await?))
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::{ActivityLevel, ActivitySource};
use crate::chat::ChatMessage;
use crate::error::AppError;
use crate::state::SharedState;
use crate::widgets::{ChatReply, ChatWidget};

const MAX_MESSAGE_CHARS: usize = 10_000;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatSessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub pending: bool,
    pub messages: Vec<ChatMessage>,
}

async fn session_response(id: Uuid, widget: &ChatWidget) -> ChatSessionResponse {
    ChatSessionResponse {
        id,
        created_at: widget.created_at(),
        pending: widget.is_pending(),
        messages: widget.messages().await,
    }
}

async fn find(state: &SharedState, id: Uuid) -> Result<std::sync::Arc<ChatWidget>, AppError> {
    state
        .chat(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("chat session {}", id)))
}

// --- Route handlers ---

/// POST /chat — open a new session, greeting included.
pub async fn create(State(state): State<SharedState>) -> Json<ChatSessionResponse> {
    let (id, widget) = state.create_chat().await;
    state
        .activity
        .emit(
            ActivitySource::Chat,
            ActivityLevel::Info,
            format!("chat session {} opened", id),
        )
        .await;
    Json(session_response(id, &widget).await)
}

/// GET /chat/{id} — full history.
pub async fn history(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSessionResponse>, AppError> {
    let widget = find(&state, id).await?;
    Ok(Json(session_response(id, &widget).await))
}

/// DELETE /chat/{id} — close a session and drop its history.
pub async fn close(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.remove_chat(id).await {
        return Err(AppError::NotFound(format!("chat session {}", id)));
    }
    state
        .activity
        .emit(
            ActivitySource::Chat,
            ActivityLevel::Info,
            format!("chat session {} closed", id),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /chat/{id}/messages — post a user message and wait for the reply.
pub async fn post_message(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let chars = body.content.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message too long ({} chars, max {})",
            chars, MAX_MESSAGE_CHARS
        )));
    }

    let widget = find(&state, id).await?;
    let reply = widget.send(&state.gateway, &body.content).await?;

    if let Some(e) = &reply.error {
        state
            .activity
            .emit(
                ActivitySource::Chat,
                ActivityLevel::Warn,
                format!("chat {} fell back: {}", id, e),
            )
            .await;
    }

    Ok(Json(reply))
}

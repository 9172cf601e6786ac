//! HTTP endpoints
//!
//! REST API for running booking conversations.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use booking_agent_core::BookingRequest;
use booking_agent_dialog::{DialogError, DialogOutcome, DialogTurn};

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation endpoints
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations", get(list_conversations))
        .route("/api/conversations/:id", get(get_conversation))
        .route("/api/conversations/:id", delete(delete_conversation))
        .route("/api/conversations/:id/messages", post(send_message))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct CreateConversationRequest {
    /// Optional opening utterance, e.g. "book me a flight to Roma"
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConversationReply {
    conversation_id: String,
    reply: String,
    ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking: Option<BookingRequest>,
}

/// Start a conversation. An opening message is run through NLU to
/// pre-fill whatever slots it mentions; the reply is the first prompt.
async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationReply>), ServerError> {
    let details = match request.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => prefill(&state, message).await,
        _ => BookingRequest::new(),
    };

    let mut dialog = state.new_dialog(details);
    let turn = dialog.begin().map_err(dialog_error)?;

    let session = state.sessions.create(dialog)?;

    Ok((
        StatusCode::CREATED,
        Json(reply_for(session.id.clone(), turn)),
    ))
}

/// Run the opening utterance through the recognizer.
async fn prefill(state: &AppState, message: &str) -> BookingRequest {
    if !state.recognizer.is_configured() {
        return BookingRequest {
            initial_message: Some(message.to_string()),
            ..Default::default()
        };
    }

    match state.recognizer.recognize(message).await {
        Ok(result) => BookingRequest::from_entities(message, &result.entities),
        Err(e) => {
            tracing::warn!(error = %e, "opening recognition failed, starting empty");
            BookingRequest {
                initial_message: Some(message.to_string()),
                ..Default::default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

/// Feed one user message to a conversation.
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ConversationReply>, ServerError> {
    if request.message.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::Session(format!("unknown conversation: {id}")))?;
    session.touch();

    let mut dialog = session.dialog.lock().await;
    let turn = dialog.handle(&request.message).await.map_err(dialog_error)?;
    drop(dialog);

    let reply = reply_for(id.clone(), turn);
    if reply.ended {
        state.sessions.remove(&id);
    }

    Ok(Json(reply))
}

/// Translate a dialog failure into the transport-level error taxonomy.
fn dialog_error(err: DialogError) -> ServerError {
    match err {
        DialogError::Ended => ServerError::ConversationEnded,
        DialogError::Timex(e) => ServerError::InvalidRequest(e.to_string()),
        other => ServerError::Internal(other.to_string()),
    }
}

fn reply_for(conversation_id: String, turn: DialogTurn) -> ConversationReply {
    match turn {
        DialogTurn::Prompt(reply) => ConversationReply {
            conversation_id,
            reply,
            ended: false,
            outcome: None,
            booking: None,
        },
        DialogTurn::Ended { message, outcome } => {
            let (label, booking) = match outcome {
                DialogOutcome::Confirmed(request) => ("confirmed", Some(request)),
                DialogOutcome::Declined => ("declined", None),
                DialogOutcome::Cancelled => ("cancelled", None),
            };
            ConversationReply {
                conversation_id,
                reply: message,
                ended: true,
                outcome: Some(label),
                booking,
            }
        }
    }
}

/// Get conversation info
async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::Session(format!("unknown conversation: {id}")))?;

    let dialog = session.dialog.lock().await;
    Ok(Json(serde_json::json!({
        "conversation_id": session.id,
        "ended": dialog.is_ended(),
        "details": dialog.details(),
    })))
}

/// Delete conversation
async fn delete_conversation(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// List conversations
async fn list_conversations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let conversations = state.sessions.list();
    Json(serde_json::json!({
        "conversations": conversations,
        "count": conversations.len(),
    }))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "conversations": state.sessions.count(),
    }))
}

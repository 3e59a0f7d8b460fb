//! Conversation and direct-messaging endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::conversation::{ConversationDetails, CreateMessage, Message, MessageQuery},
};

use super::AuthenticatedUser;

/// Conversations of the authenticated user
#[utoipa::path(
    get,
    path = "/conversations",
    tag = "messages",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Conversations", body = Vec<ConversationDetails>))
)]
pub async fn list_conversations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ConversationDetails>>> {
    Ok(Json(
        state.services.messaging.list_conversations(claims.user_id).await?,
    ))
}

/// Messages of one conversation, chronological
#[utoipa::path(
    get,
    path = "/conversations/{id}/messages",
    tag = "messages",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Conversation ID"),
        MessageQuery
    ),
    responses(
        (status = 200, description = "Messages", body = Vec<Message>),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    )
)]
pub async fn list_conversation_messages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = state
        .services
        .messaging
        .conversation_messages(id, claims.user_id, &query)
        .await?;
    Ok(Json(messages))
}

/// Send a message, creating the conversation if only a recipient is given
#[utoipa::path(
    post,
    path = "/messages",
    tag = "messages",
    security(("bearer_auth" = [])),
    request_body = CreateMessage,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Missing conversation or recipient"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation, recipient or attachment not found")
    )
)]
pub async fn create_message(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<Message>)> {
    request.validate()?;
    let message = state
        .services
        .messaging
        .post_message(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Mark a received message as read
#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    tag = "messages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = Message),
        (status = 403, description = "Not a recipient of this message"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn mark_message_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Message>> {
    let message = state.services.messaging.mark_read(id, claims.user_id).await?;
    Ok(Json(message))
}

/**
 * Contact Message Routes
 * Public contact form intake plus the admin inbox
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{ContactMessage, NewContactMessage},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// POST /api/contact - Accept a message from the public contact form
pub async fn submit_contact_message(
    payload: Result<Json<NewContactMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let message = storage::create_contact_message(pool.as_ref(), &payload).await?;

    tracing::info!("Contact message received (id {})", message.id);

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/admin/messages - List the inbox, newest first (auth required)
pub async fn list_messages() -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let messages = storage::list_contact_messages(pool.as_ref()).await?;
    Ok(Json(messages))
}

/// PATCH /api/admin/messages/{id}/read - Mark a message as read (auth required)
pub async fn mark_message_read(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let marked = storage::mark_message_read(pool.as_ref(), id).await?;
    if !marked {
        return Err(ApiError::NotFound("Message"));
    }
    Ok(Json(MessageResponse {
        message: "Message marked as read".to_string(),
    }))
}

/// DELETE /api/admin/messages/{id} - Delete a message (auth required, idempotent)
pub async fn delete_message(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_contact_message(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Message deleted successfully".to_string(),
    }))
}

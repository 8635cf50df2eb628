/**
 * Education Routes
 * Degrees and programs with an ordered year range
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{Education, NewEducation, UpdateEducation},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/education - List all education entries
pub async fn list_education() -> Result<Json<Vec<Education>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let entries = storage::list_education(pool.as_ref()).await?;
    Ok(Json(entries))
}

/// POST /api/admin/education - Create an education entry (auth required)
pub async fn create_education(
    payload: Result<Json<NewEducation>, JsonRejection>,
) -> Result<(StatusCode, Json<Education>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let entry = storage::create_education(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /api/admin/education/{id} - Merge partial fields onto an entry (auth required).
/// Year ordering is validated against the merged record, not just the patch.
pub async fn update_education(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateEducation>, JsonRejection>,
) -> Result<Json<Education>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let entry = storage::update_education(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Education entry"))?;
    Ok(Json(entry))
}

/// DELETE /api/admin/education/{id} - Delete an entry (auth required, idempotent)
pub async fn delete_education(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_education(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Education entry deleted successfully".to_string(),
    }))
}

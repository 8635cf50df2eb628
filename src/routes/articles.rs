/**
 * Article Routes
 * Long-form posts; the public list feeds the blog page and the RSS feed
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{Article, NewArticle, UpdateArticle},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/articles - List all articles, newest first
pub async fn list_articles() -> Result<Json<Vec<Article>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let articles = storage::list_articles(pool.as_ref()).await?;
    Ok(Json(articles))
}

/// GET /api/articles/{id} - Get a single article
pub async fn get_article(Path(id): Path<i32>) -> Result<Json<Article>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let article = storage::get_article(pool.as_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Article"))?;
    Ok(Json(article))
}

/// POST /api/admin/articles - Create an article (auth required)
pub async fn create_article(
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let article = storage::create_article(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PATCH /api/admin/articles/{id} - Merge partial fields onto an article (auth required)
pub async fn update_article(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateArticle>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let article = storage::update_article(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Article"))?;
    Ok(Json(article))
}

/// DELETE /api/admin/articles/{id} - Delete an article (auth required, idempotent)
pub async fn delete_article(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_article(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Article deleted successfully".to_string(),
    }))
}

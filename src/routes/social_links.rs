/**
 * Social Link Routes
 * Links are keyed by case-insensitive name; creating an existing name
 * overwrites it in a single conditional insert
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{NewSocialLink, SocialLink, UpdateSocialLink},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/social-links - List all social links
pub async fn list_social_links() -> Result<Json<Vec<SocialLink>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let links = storage::list_social_links(pool.as_ref()).await?;
    Ok(Json(links))
}

/// POST /api/admin/social-links - Create or overwrite a link by name (auth required)
pub async fn upsert_social_link(
    payload: Result<Json<NewSocialLink>, JsonRejection>,
) -> Result<(StatusCode, Json<SocialLink>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let link = storage::upsert_social_link(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PATCH /api/admin/social-links/{id} - Merge partial fields onto a link (auth required)
pub async fn update_social_link(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateSocialLink>, JsonRejection>,
) -> Result<Json<SocialLink>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let link = storage::update_social_link(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Social link"))?;
    Ok(Json(link))
}

/// DELETE /api/admin/social-links/{id} - Delete a link (auth required, idempotent)
pub async fn delete_social_link(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_social_link(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Social link deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    use crate::routes::auth::create_access_token;

    fn admin_app() -> Router {
        Router::new()
            .route("/api/admin/social-links", post(upsert_social_link))
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin))
    }

    #[tokio::test]
    async fn test_upsert_accepts_order_key_and_defaults_it() {
        let token = create_access_token(1, "admin").unwrap();
        // "order" is the wire name for sort_order and may be omitted entirely.
        for body in [
            serde_json::json!({ "name": "GitHub", "icon": "github", "url": "https://github.com/x", "order": 2 }),
            serde_json::json!({ "name": "GitHub", "icon": "github", "url": "https://github.com/x" }),
        ] {
            let req = Request::post("/api/admin/social-links")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap();
            let res = admin_app().oneshot(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[tokio::test]
    async fn test_upsert_blank_url_rejected() {
        let token = create_access_token(1, "admin").unwrap();
        let body = serde_json::json!({ "name": "GitHub", "icon": "github", "url": "" });
        let req = Request::post("/api/admin/social-links")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = admin_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

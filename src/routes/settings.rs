/**
 * Site Settings Routes
 * The settings singleton behind the public landing page
 */
use axum::{extract::rejection::JsonRejection, Json};

use crate::db::{
    self,
    models::{SiteSettings, UpdateSiteSettings},
    storage,
};
use crate::error::ApiError;

/// GET /api/settings - Read the settings singleton
pub async fn get_settings() -> Result<Json<SiteSettings>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let settings = storage::get_site_settings(pool.as_ref())
        .await?
        .ok_or(ApiError::NotFound("Site settings"))?;
    Ok(Json(settings))
}

/// PATCH /api/admin/settings - Merge partial fields onto the singleton (auth required)
pub async fn update_settings(
    payload: Result<Json<UpdateSiteSettings>, JsonRejection>,
) -> Result<Json<SiteSettings>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let settings = storage::update_site_settings(pool.as_ref(), payload)
        .await?
        .ok_or(ApiError::NotFound("Site settings"))?;
    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, patch};
    use axum::Router;
    use tower::ServiceExt;

    use crate::routes::auth::create_access_token;

    fn app() -> Router {
        let admin = Router::new()
            .route("/api/admin/settings", patch(update_settings))
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin));
        Router::new()
            .route("/api/settings", get(get_settings))
            .merge(admin)
    }

    #[tokio::test]
    async fn test_get_settings_is_public() {
        let req = Request::get("/api/settings").body(Body::empty()).unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_update_settings_requires_token() {
        let body = serde_json::json!({ "heroTitle": "New title" });
        let req = Request::patch("/api/admin/settings")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_settings_rejects_bad_email() {
        let token = create_access_token(1, "admin").unwrap();
        let body = serde_json::json!({ "email": "not-an-email" });
        let req = Request::patch("/api/admin/settings")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fieldErrors"]["email"], "Please enter a valid email");
    }

    #[tokio::test]
    async fn test_update_settings_accepts_photo_only_patch() {
        let token = create_access_token(1, "admin").unwrap();
        let body = serde_json::json!({ "profilePhoto": "/uploads/portrait.png" });
        let req = Request::patch("/api/admin/settings")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

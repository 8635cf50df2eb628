/**
 * Project Routes
 * Public reads plus the admin CRUD surface for portfolio projects
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{NewProject, Project, UpdateProject},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/projects - List all projects, newest first
pub async fn list_projects() -> Result<Json<Vec<Project>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let projects = storage::list_projects(pool.as_ref()).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id} - Get a single project
pub async fn get_project(Path(id): Path<i32>) -> Result<Json<Project>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let project = storage::get_project(pool.as_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    Ok(Json(project))
}

/// POST /api/admin/projects - Create a project (auth required)
pub async fn create_project(
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let project = storage::create_project(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/admin/projects/{id} - Merge partial fields onto a project (auth required)
pub async fn update_project(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateProject>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let project = storage::update_project(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    Ok(Json(project))
}

/// DELETE /api/admin/projects/{id} - Delete a project (auth required, idempotent)
pub async fn delete_project(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_project(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Project deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, patch, post};
    use axum::Router;
    use tower::ServiceExt;

    use crate::routes::auth::create_access_token;

    fn app() -> Router {
        let admin = Router::new()
            .route("/api/admin/projects", post(create_project))
            .route(
                "/api/admin/projects/{id}",
                patch(update_project).delete(delete_project),
            )
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin));
        Router::new()
            .route("/api/projects", get(list_projects))
            .route("/api/projects/{id}", get(get_project))
            .merge(admin)
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, axum::body::Bytes) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    fn admin_token() -> String {
        create_access_token(1, "admin").unwrap()
    }

    #[tokio::test]
    async fn test_list_projects_without_database_returns_503() {
        let (status, bytes) = send(app(), "GET", "/api/projects", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Database not available");
    }

    #[tokio::test]
    async fn test_get_project_with_non_numeric_id_is_client_error() {
        let (status, _) = send(app(), "GET", "/api/projects/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_project_requires_token() {
        let body = serde_json::json!({
            "title": "Nebula Tracker",
            "description": "Realtime deep-sky object tracker",
            "image": "/uploads/nebula.png"
        });
        let (status, _) = send(app(), "POST", "/api/admin/projects", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_project_empty_title_returns_field_errors() {
        let body = serde_json::json!({
            "title": "   ",
            "description": "Realtime deep-sky object tracker",
            "image": "/uploads/nebula.png"
        });
        let (status, bytes) = send(
            app(),
            "POST",
            "/api/admin/projects",
            Some(&admin_token()),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["fieldErrors"]["title"], "Title is required");
    }

    #[tokio::test]
    async fn test_create_project_missing_field_returns_bad_request() {
        let body = serde_json::json!({ "title": "Nebula Tracker" });
        let (status, _) = send(
            app(),
            "POST",
            "/api/admin/projects",
            Some(&admin_token()),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_project_valid_payload_without_database_returns_503() {
        let body = serde_json::json!({
            "title": "Nebula Tracker",
            "description": "Realtime deep-sky object tracker",
            "image": "/uploads/nebula.png",
            "technologies": ["rust", "axum"],
            "featured": true
        });
        let (status, _) = send(
            app(),
            "POST",
            "/api/admin/projects",
            Some(&admin_token()),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_update_project_empty_patch_field_rejected_before_lookup() {
        let body = serde_json::json!({ "image": "" });
        let (status, bytes) = send(
            app(),
            "PATCH",
            "/api/admin/projects/1",
            Some(&admin_token()),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fieldErrors"]["image"], "Image is required");
    }

    #[tokio::test]
    async fn test_delete_project_requires_token() {
        let (status, _) = send(app(), "DELETE", "/api/admin/projects/1", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

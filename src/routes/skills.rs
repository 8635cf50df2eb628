/**
 * Skill Routes
 * Skills grouped by category, levels bounded 0-100
 */
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::db::{
    self,
    models::{NewSkill, Skill, UpdateSkill},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// Query parameters for GET /api/skills
#[derive(Debug, Deserialize)]
pub struct SkillsQuery {
    pub category: Option<String>,
}

/// GET /api/skills - List skills, optionally filtered by ?category=
pub async fn list_skills(Query(query): Query<SkillsQuery>) -> Result<Json<Vec<Skill>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let skills = storage::list_skills(pool.as_ref(), query.category.as_deref()).await?;
    Ok(Json(skills))
}

/// POST /api/admin/skills - Create a skill (auth required)
pub async fn create_skill(
    payload: Result<Json<NewSkill>, JsonRejection>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let skill = storage::create_skill(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// PATCH /api/admin/skills/{id} - Merge partial fields onto a skill (auth required)
pub async fn update_skill(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateSkill>, JsonRejection>,
) -> Result<Json<Skill>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let skill = storage::update_skill(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Skill"))?;
    Ok(Json(skill))
}

/// DELETE /api/admin/skills/{id} - Delete a skill (auth required, idempotent)
pub async fn delete_skill(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_skill(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Skill deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;

    use crate::routes::auth::create_access_token;

    fn app() -> Router {
        let admin = Router::new()
            .route("/api/admin/skills", post(create_skill))
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin));
        Router::new()
            .route("/api/skills", get(list_skills))
            .merge(admin)
    }

    #[tokio::test]
    async fn test_list_skills_accepts_category_filter() {
        let req = Request::get("/api/skills?category=frontend")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        // No database in tests; the route itself must still parse the query.
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_create_skill_level_out_of_range_rejected() {
        let token = create_access_token(1, "admin").unwrap();
        for level in [-1, 101] {
            let body = serde_json::json!({
                "name": "Rust",
                "category": "backend",
                "level": level,
                "icon": "rust-icon"
            });
            let req = Request::post("/api/admin/skills")
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
            assert_eq!(body["fieldErrors"]["level"], "Level must be between 0 and 100");
        }
    }

    #[tokio::test]
    async fn test_create_skill_boundary_levels_pass_validation() {
        let token = create_access_token(1, "admin").unwrap();
        for level in [0, 100] {
            let body = serde_json::json!({
                "name": "Rust",
                "category": "backend",
                "level": level,
                "icon": "rust-icon"
            });
            let req = Request::post("/api/admin/skills")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap();
            let res = app().oneshot(req).await.unwrap();
            // Past validation; only the missing pool stops the insert.
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[tokio::test]
    async fn test_create_skill_requires_token() {
        let body = serde_json::json!({
            "name": "Rust",
            "category": "backend",
            "level": 90,
            "icon": "rust-icon"
        });
        let req = Request::post("/api/admin/skills")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

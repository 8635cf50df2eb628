/**
 * Activity Routes
 * Recurring activities shown on the landing page
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{Activity, NewActivity, UpdateActivity},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/activities - List all activities
pub async fn list_activities() -> Result<Json<Vec<Activity>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let activities = storage::list_activities(pool.as_ref()).await?;
    Ok(Json(activities))
}

/// POST /api/admin/activities - Create an activity (auth required)
pub async fn create_activity(
    payload: Result<Json<NewActivity>, JsonRejection>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let activity = storage::create_activity(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// PATCH /api/admin/activities/{id} - Merge partial fields onto an activity (auth required)
pub async fn update_activity(
    Path(id): Path<i32>,
    payload: Result<Json<UpdateActivity>, JsonRejection>,
) -> Result<Json<Activity>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let activity = storage::update_activity(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Activity"))?;
    Ok(Json(activity))
}

/// DELETE /api/admin/activities/{id} - Delete an activity (auth required, idempotent)
pub async fn delete_activity(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_activity(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Activity deleted successfully".to_string(),
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
            .route("/api/admin/activities", post(create_activity))
            .layer(axum::middleware::from_fn(crate::routes::auth::require_admin))
    }

    #[tokio::test]
    async fn test_create_activity_blank_frequency_rejected() {
        let token = create_access_token(1, "admin").unwrap();
        let body = serde_json::json!({
            "title": "Stargazing sessions",
            "description": "Weekly telescope meetup notes",
            "frequency": " ",
            "icon": "telescope"
        });
        let req = Request::post("/api/admin/activities")
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = admin_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fieldErrors"]["frequency"], "Frequency is required");
    }

    #[tokio::test]
    async fn test_create_activity_requires_token() {
        let body = serde_json::json!({
            "title": "Stargazing sessions",
            "description": "Weekly telescope meetup notes",
            "frequency": "weekly",
            "icon": "telescope"
        });
        let req = Request::post("/api/admin/activities")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let res = admin_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

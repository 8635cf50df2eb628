/**
 * Pricing Routes
 * Service tiers with a non-negative price in whole currency units
 */
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};

use crate::db::{
    self,
    models::{NewPricingPlan, PricingPlan, UpdatePricingPlan},
    storage,
};
use crate::error::ApiError;
use crate::routes::MessageResponse;

/// GET /api/pricing - List all pricing plans
pub async fn list_pricing_plans() -> Result<Json<Vec<PricingPlan>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let plans = storage::list_pricing_plans(pool.as_ref()).await?;
    Ok(Json(plans))
}

/// POST /api/admin/pricing - Create a pricing plan (auth required)
pub async fn create_pricing_plan(
    payload: Result<Json<NewPricingPlan>, JsonRejection>,
) -> Result<(StatusCode, Json<PricingPlan>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let plan = storage::create_pricing_plan(pool.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PATCH /api/admin/pricing/{id} - Merge partial fields onto a plan (auth required)
pub async fn update_pricing_plan(
    Path(id): Path<i32>,
    payload: Result<Json<UpdatePricingPlan>, JsonRejection>,
) -> Result<Json<PricingPlan>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.validate()?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let plan = storage::update_pricing_plan(pool.as_ref(), id, payload)
        .await?
        .ok_or(ApiError::NotFound("Pricing plan"))?;
    Ok(Json(plan))
}

/// DELETE /api/admin/pricing/{id} - Delete a plan (auth required, idempotent)
pub async fn delete_pricing_plan(Path(id): Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    storage::delete_pricing_plan(pool.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Pricing plan deleted successfully".to_string(),
    }))
}

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    handlers::common::validate_input,
    pagination::PageParams,
    responses::{created_response, message_response, paginated_response, success_response},
    services::supplies::{SupplyFilter, SupplyInput},
    AppState,
};

type ApiResult = Result<Response, crate::errors::ApiError>;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplyListQuery {
    /// 1-based page number; out-of-range values are clamped
    pub page: Option<i64>,
    /// Items per page, capped at 100
    pub page_size: Option<i64>,
    /// Restrict to dealers of one branch
    pub branch_id: Option<i64>,
    /// Restrict to one dealer
    pub dealer_id: Option<i64>,
    /// Case-insensitive match on dealer, product, serial or invoice fields
    pub search: Option<String>,
}

impl SupplyListQuery {
    fn page_params(&self) -> PageParams {
        let defaults = PageParams::default();
        PageParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}

fn default_count() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupplyRequest {
    pub dealer_id: i64,
    /// Optional cross-check: must match the dealer's branch when present
    pub branch_id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub product_name: String,
    #[validate(length(min = 1, max = 100))]
    pub invoice_number: String,
    #[validate(length(min = 1, max = 100))]
    pub serial_number: String,
    pub purchase_date: Option<NaiveDate>,
    #[serde(default = "default_count")]
    #[validate(range(min = 1, message = "count must be a positive integer"))]
    pub count: i32,
    pub chase_number: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_variant: Option<String>,
    pub vehicle_warranty: Option<String>,
    pub controller: Option<String>,
    pub motor: Option<String>,
    pub battery_number: Option<String>,
    pub battery_model: Option<String>,
    pub battery_variant: Option<String>,
    pub battery_warranty: Option<String>,
    pub bulging_warranty: Option<String>,
    pub charger_number: Option<String>,
    pub charger_model: Option<String>,
    pub charger_type: Option<String>,
    pub charger_variant: Option<String>,
    pub charger_warranty: Option<String>,
    pub remarks: Option<String>,
}

impl SupplyRequest {
    fn into_input(self) -> SupplyInput {
        SupplyInput {
            dealer_id: self.dealer_id,
            branch_id: self.branch_id,
            product_name: self.product_name,
            invoice_number: self.invoice_number,
            serial_number: self.serial_number,
            purchase_date: self.purchase_date,
            count: self.count,
            chase_number: self.chase_number,
            vehicle_model: self.vehicle_model,
            vehicle_variant: self.vehicle_variant,
            vehicle_warranty: self.vehicle_warranty,
            controller: self.controller,
            motor: self.motor,
            battery_number: self.battery_number,
            battery_model: self.battery_model,
            battery_variant: self.battery_variant,
            battery_warranty: self.battery_warranty,
            bulging_warranty: self.bulging_warranty,
            charger_number: self.charger_number,
            charger_model: self.charger_model,
            charger_type: self.charger_type,
            charger_variant: self.charger_variant,
            charger_warranty: self.charger_warranty,
            remarks: self.remarks,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SupplyBatchRequest {
    #[validate(length(min = 1, message = "at least one supply record is required"))]
    pub supplies: Vec<SupplyRequest>,
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies",
    params(SupplyListQuery),
    responses(
        (status = 200, description = "Supplies listed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn list_supplies(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SupplyListQuery>,
) -> ApiResult {
    let page_params = query.page_params();
    let filter = SupplyFilter {
        branch_id: query.branch_id,
        dealer_id: query.dealer_id,
        search: query.search,
    };
    let (items, meta) = state
        .supply_service()
        .list(&principal, &filter, &page_params, uri.path())
        .await?;
    Ok(paginated_response("Supplies retrieved", items, meta))
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies/:id",
    params(("id" = i64, Path, description = "Supply id")),
    responses(
        (status = 200, description = "Supply fetched"),
        (status = 404, description = "Supply not found", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn get_supply(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    let supply = state.supply_service().get(&principal, id).await?;
    Ok(success_response("Supply retrieved", supply))
}

#[utoipa::path(
    post,
    path = "/api/v1/supplies",
    request_body = SupplyRequest,
    responses(
        (status = 201, description = "Supply created"),
        (status = 400, description = "Branch mismatch or invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Serial number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn create_supply(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<SupplyRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let supply = state
        .supply_service()
        .create(&principal, payload.into_input())
        .await?;
    Ok(created_response("Supply created", supply))
}

#[utoipa::path(
    post,
    path = "/api/v1/supplies/batch",
    request_body = SupplyBatchRequest,
    responses(
        (status = 201, description = "Batch created; nothing persisted on any failure"),
        (status = 400, description = "A batch item failed validation", body = crate::errors::ErrorResponse),
        (status = 409, description = "A serial number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn create_supply_batch(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<SupplyBatchRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    for item in &payload.supplies {
        validate_input(item)?;
    }
    let inputs = payload
        .supplies
        .into_iter()
        .map(SupplyRequest::into_input)
        .collect();
    let ids = state
        .supply_service()
        .create_batch(&principal, inputs)
        .await?;
    Ok(created_response(
        format!("{} supplies created", ids.len()),
        serde_json::json!({ "ids": ids }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/supplies/:id",
    request_body = SupplyRequest,
    params(("id" = i64, Path, description = "Supply id")),
    responses(
        (status = 200, description = "Supply updated"),
        (status = 404, description = "Supply not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Serial number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn update_supply(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<SupplyRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let supply = state
        .supply_service()
        .update(&principal, id, payload.into_input())
        .await?;
    Ok(success_response("Supply updated", supply))
}

#[utoipa::path(
    delete,
    path = "/api/v1/supplies/:id",
    params(("id" = i64, Path, description = "Supply id")),
    responses(
        (status = 200, description = "Supply deleted"),
        (status = 404, description = "Supply not found", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn delete_supply(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    state.supply_service().delete(&principal, id).await?;
    Ok(message_response("Supply deleted"))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/supplies", get(list_supplies).post(create_supply))
        .route("/supplies/batch", post(create_supply_batch))
        .route(
            "/supplies/:id",
            get(get_supply).put(update_supply).delete(delete_supply),
        )
}

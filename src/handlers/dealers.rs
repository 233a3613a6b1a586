use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    handlers::common::validate_input,
    pagination::{PageMeta, PageParams},
    responses::{created_response, message_response, paginated_response, success_response},
    services::{
        dashboard::CategoryCounts,
        dealers::{DealerFilter, DealerInput, DealerView},
        supplies::SupplyView,
    },
    AppState,
};

type ApiResult = Result<Response, crate::errors::ApiError>;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DealerListQuery {
    /// 1-based page number; out-of-range values are clamped
    pub page: Option<i64>,
    /// Items per page, capped at 100
    pub page_size: Option<i64>,
    /// Restrict to one branch
    pub branch_id: Option<i64>,
    /// Case-insensitive match on name, mobile number or company name
    pub search: Option<String>,
}

impl DealerListQuery {
    fn page_params(&self) -> PageParams {
        let defaults = PageParams::default();
        PageParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DealerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 7, max = 15, message = "mobile number must be 7-15 digits"))]
    pub mobile_number: String,
    pub company_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub branch_id: i64,
}

impl DealerRequest {
    fn into_input(self) -> DealerInput {
        DealerInput {
            name: self.name,
            mobile_number: self.mobile_number,
            company_name: self.company_name,
            email: self.email,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            pincode: self.pincode,
            state: self.state,
            branch_id: self.branch_id,
        }
    }
}

/// Dealer profile with its inventory category totals and a page of its
/// purchase history.
#[derive(Debug, Serialize, ToSchema)]
pub struct DealerDetail {
    #[serde(flatten)]
    pub dealer: DealerView,
    pub counts: CategoryCounts,
    pub supplies: Vec<SupplyView>,
    pub pagination: PageMeta,
}

#[utoipa::path(
    get,
    path = "/api/v1/dealers",
    params(DealerListQuery),
    responses(
        (status = 200, description = "Dealers listed"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn list_dealers(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DealerListQuery>,
) -> ApiResult {
    let page_params = query.page_params();
    let filter = DealerFilter {
        branch_id: query.branch_id,
        search: query.search,
    };
    let (items, meta) = state
        .dealer_service()
        .list(&principal, &filter, &page_params, uri.path())
        .await?;
    Ok(paginated_response("Dealers retrieved", items, meta))
}

#[utoipa::path(
    get,
    path = "/api/v1/dealers/:id",
    params(("id" = i64, Path, description = "Dealer id")),
    responses(
        (status = 200, description = "Dealer fetched"),
        (status = 404, description = "Dealer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn get_dealer(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    let dealer = state.dealer_service().get(&principal, id).await?;
    Ok(success_response("Dealer retrieved", dealer))
}

#[utoipa::path(
    post,
    path = "/api/v1/dealers",
    request_body = DealerRequest,
    responses(
        (status = 201, description = "Dealer created with login account"),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Login account already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn create_dealer(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<DealerRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let dealer = state
        .dealer_service()
        .create(&principal, payload.into_input())
        .await?;
    Ok(created_response("Dealer created", dealer))
}

#[utoipa::path(
    put,
    path = "/api/v1/dealers/:id",
    request_body = DealerRequest,
    params(("id" = i64, Path, description = "Dealer id")),
    responses(
        (status = 200, description = "Dealer updated"),
        (status = 404, description = "Dealer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn update_dealer(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DealerRequest>,
) -> ApiResult {
    validate_input(&payload)?;
    let dealer = state
        .dealer_service()
        .update(&principal, id, payload.into_input())
        .await?;
    Ok(success_response("Dealer updated", dealer))
}

#[utoipa::path(
    delete,
    path = "/api/v1/dealers/:id",
    params(("id" = i64, Path, description = "Dealer id")),
    responses(
        (status = 200, description = "Dealer deleted"),
        (status = 404, description = "Dealer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn delete_dealer(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult {
    state.dealer_service().delete(&principal, id).await?;
    Ok(message_response("Dealer deleted"))
}

#[utoipa::path(
    get,
    path = "/api/v1/dealers/:id/supplies",
    params(("id" = i64, Path, description = "Dealer id"), PageParams),
    responses(
        (status = 200, description = "Dealer purchase history"),
        (status = 404, description = "Dealer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn dealer_supplies(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult {
    let (items, meta) = state
        .supply_service()
        .list_for_dealer(&principal, id, &params, uri.path())
        .await?;
    Ok(paginated_response("Dealer supplies retrieved", items, meta))
}

#[utoipa::path(
    get,
    path = "/api/v1/dealers/:id/detail",
    params(("id" = i64, Path, description = "Dealer id"), PageParams),
    responses(
        (status = 200, description = "Dealer profile with category totals and purchase history"),
        (status = 404, description = "Dealer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dealers"
)]
pub async fn dealer_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult {
    let dealer = state.dealer_service().get(&principal, id).await?;
    let counts = state
        .dashboard_service()
        .counts_for_dealer(&principal, id)
        .await?;
    let (supplies, pagination) = state
        .supply_service()
        .list_for_dealer(&principal, id, &params, uri.path())
        .await?;
    Ok(success_response(
        "Dealer detail retrieved",
        DealerDetail {
            dealer,
            counts,
            supplies,
            pagination,
        },
    ))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dealers", get(list_dealers).post(create_dealer))
        .route(
            "/dealers/:id",
            get(get_dealer).put(update_dealer).delete(delete_dealer),
        )
        .route("/dealers/:id/supplies", get(dealer_supplies))
        .route("/dealers/:id/detail", get(dealer_detail))
}

//! OpenAPI document and Swagger UI wiring.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DealerDesk API",
        description = r#"
Backend for dealer network and inventory management.

All responses share one envelope: `{status, message, data}` on success,
`{status, message, error: {message, code}}` on failure. List endpoints add a
`pagination` block with `count`, `next`, `previous`, `page_size`,
`current_page` and `total_pages`.

Authenticate with `Authorization: Bearer <access-token>`; obtain tokens from
`/api/v1/auth/login`.
"#
    ),
    tags(
        (name = "auth", description = "Login, signup and password reset"),
        (name = "roles", description = "Role catalogue"),
        (name = "branches", description = "Branch management"),
        (name = "dealers", description = "Dealer profiles and provisioned accounts"),
        (name = "supplies", description = "Product supply records"),
        (name = "dashboard", description = "Inventory category aggregation"),
        (name = "health", description = "Liveness checks")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::auth::refresh,
        crate::handlers::auth::signup,
        crate::handlers::auth::forgot_password,
        crate::handlers::auth::verify_otp,
        crate::handlers::auth::reset_password,

        crate::handlers::roles::list_roles,
        crate::handlers::roles::get_role,
        crate::handlers::roles::create_role,
        crate::handlers::roles::update_role,
        crate::handlers::roles::delete_role,

        crate::handlers::branches::list_branches,
        crate::handlers::branches::get_branch,
        crate::handlers::branches::create_branch,
        crate::handlers::branches::update_branch,
        crate::handlers::branches::delete_branch,

        crate::handlers::dealers::list_dealers,
        crate::handlers::dealers::get_dealer,
        crate::handlers::dealers::create_dealer,
        crate::handlers::dealers::update_dealer,
        crate::handlers::dealers::delete_dealer,
        crate::handlers::dealers::dealer_supplies,
        crate::handlers::dealers::dealer_detail,

        crate::handlers::supplies::list_supplies,
        crate::handlers::supplies::get_supply,
        crate::handlers::supplies::create_supply,
        crate::handlers::supplies::create_supply_batch,
        crate::handlers::supplies::update_supply,
        crate::handlers::supplies::delete_supply,

        crate::handlers::dashboard::dashboard,
        crate::handlers::health::health
    ),
    components(
        schemas(
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::RefreshRequest,
            crate::handlers::auth::SignupRequest,
            crate::handlers::auth::ForgotPasswordRequest,
            crate::handlers::auth::VerifyOtpRequest,
            crate::handlers::auth::ResetPasswordRequest,
            crate::handlers::roles::RoleRequest,
            crate::handlers::branches::BranchRequest,
            crate::handlers::dealers::DealerRequest,
            crate::handlers::dealers::DealerDetail,
            crate::handlers::supplies::SupplyRequest,
            crate::handlers::supplies::SupplyBatchRequest,
            crate::handlers::health::HealthStatus,
            crate::services::accounts::UserInfo,
            crate::services::accounts::AuthPayload,
            crate::services::dealers::DealerView,
            crate::services::supplies::SupplyView,
            crate::services::dashboard::CategoryCounts,
            crate::services::dashboard::DashboardSummary,
            crate::auth::TokenPair,
            crate::errors::ErrorBody,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::AuthService,
    db::DbPool,
    entities::{branch, dealer, product_supply, user},
    errors::ServiceError,
    pagination::{self, PageMeta, PageParams},
    scope::{dealer_detail_scope, dealer_scope, Principal},
    services::ci_like,
};

/// Dealer row enriched with its branch name for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct DealerView {
    pub id: i64,
    pub name: String,
    pub mobile_number: String,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub branch_id: i64,
    pub branch_name: String,
    pub user_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fields accepted on dealer creation and update.
#[derive(Debug, Clone)]
pub struct DealerInput {
    pub name: String,
    pub mobile_number: String,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub branch_id: i64,
}

/// Caller-supplied list filters, applied on top of the access scope.
#[derive(Debug, Clone, Default)]
pub struct DealerFilter {
    pub branch_id: Option<i64>,
    pub search: Option<String>,
}

fn view_query() -> Select<dealer::Entity> {
    dealer::Entity::find()
        .join(JoinType::InnerJoin, dealer::Relation::Branch.def())
        .column_as(
            sea_orm::sea_query::Expr::col((branch::Entity, branch::Column::Name)),
            "branch_name",
        )
}

fn search_condition(term: &str) -> Condition {
    Condition::any()
        .add(ci_like((dealer::Entity, dealer::Column::Name), term))
        .add(ci_like((dealer::Entity, dealer::Column::MobileNumber), term))
        .add(ci_like((dealer::Entity, dealer::Column::CompanyName), term))
}

/// Service for managing dealers and their provisioned login accounts.
#[derive(Clone)]
pub struct DealerService {
    db: Arc<DbPool>,
    auth: Arc<AuthService>,
}

impl DealerService {
    pub fn new(db: Arc<DbPool>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    /// Lists visible dealers, newest first.
    #[instrument(skip(self, principal))]
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &DealerFilter,
        params: &PageParams,
        path: &str,
    ) -> Result<(Vec<DealerView>, PageMeta), ServiceError> {
        let mut query = view_query()
            .filter(dealer_scope(principal))
            .order_by_desc(dealer::Column::CreatedAt)
            .order_by_desc(dealer::Column::Id);

        if let Some(branch_id) = filter.branch_id {
            query = query.filter(dealer::Column::BranchId.eq(branch_id));
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
            query = query.filter(search_condition(term));
        }

        pagination::paginate(query, self.db.as_ref(), params, path).await
    }

    /// Fetches one visible dealer. Dealer-class principals may also read
    /// their own linked profile.
    #[instrument(skip(self, principal))]
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<DealerView, ServiceError> {
        view_query()
            .filter(dealer_detail_scope(principal))
            .filter(dealer::Column::Id.eq(id))
            .into_model::<DealerView>()
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Dealer", id))
    }

    /// Creates a dealer and its linked login account in one transaction.
    ///
    /// The provisioned account uses the mobile number as username and initial
    /// password and is flagged for a forced password change.
    #[instrument(skip(self, principal, input))]
    pub async fn create(
        &self,
        principal: &Principal,
        input: DealerInput,
    ) -> Result<DealerView, ServiceError> {
        let branch = branch::Entity::find_by_id(input.branch_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Branch", input.branch_id))?;

        let username = input.mobile_number.clone();
        let account_email = input
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@dealers.local", username));
        let password_hash = self.auth.hash_password(&input.mobile_number)?;

        let txn = self.db.begin().await?;

        let taken = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username.clone()))
                    .add(user::Column::Email.eq(account_email.clone())),
            )
            .one(&txn)
            .await?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(format!(
                "A login account for '{}' already exists",
                username
            )));
        }

        let account = user::ActiveModel {
            username: Set(username),
            email: Set(account_email),
            password_hash: Set(password_hash),
            first_name: Set(Some(input.name.clone())),
            is_staff: Set(false),
            is_superuser: Set(false),
            is_active: Set(true),
            must_change_password: Set(true),
            branch_id: Set(Some(branch.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let row = dealer::ActiveModel {
            name: Set(input.name),
            mobile_number: Set(input.mobile_number),
            company_name: Set(input.company_name),
            email: Set(input.email),
            address_line1: Set(input.address_line1),
            address_line2: Set(input.address_line2),
            pincode: Set(input.pincode),
            state: Set(input.state),
            branch_id: Set(branch.id),
            user_id: Set(Some(account.id)),
            created_by: Set((principal.id > 0).then_some(principal.id)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(dealer_id = row.id, user_id = account.id, "dealer created with login account");

        Ok(DealerView {
            id: row.id,
            name: row.name,
            mobile_number: row.mobile_number,
            company_name: row.company_name,
            email: row.email,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            pincode: row.pincode,
            state: row.state,
            branch_id: branch.id,
            branch_name: branch.name,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }

    /// Updates a visible dealer.
    #[instrument(skip(self, principal, input))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        input: DealerInput,
    ) -> Result<DealerView, ServiceError> {
        let existing = dealer::Entity::find_by_id(id)
            .filter(dealer_scope(principal))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Dealer", id))?;

        if input.branch_id != existing.branch_id {
            branch::Entity::find_by_id(input.branch_id)
                .one(self.db.as_ref())
                .await?
                .ok_or_else(|| ServiceError::not_found("Branch", input.branch_id))?;
        }

        let mut model: dealer::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.mobile_number = Set(input.mobile_number);
        model.company_name = Set(input.company_name);
        model.email = Set(input.email);
        model.address_line1 = Set(input.address_line1);
        model.address_line2 = Set(input.address_line2);
        model.pincode = Set(input.pincode);
        model.state = Set(input.state);
        model.branch_id = Set(input.branch_id);
        let row = model.update(self.db.as_ref()).await?;

        self.get(principal, row.id).await
    }

    /// Deletes a visible dealer, its supplies and its linked login account in
    /// one transaction.
    #[instrument(skip(self, principal))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let existing = dealer::Entity::find_by_id(id)
            .filter(dealer_scope(principal))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Dealer", id))?;

        let txn = self.db.begin().await?;

        product_supply::Entity::delete_many()
            .filter(product_supply::Column::DealerId.eq(existing.id))
            .exec(&txn)
            .await?;
        // Clear the back-link before removing the account so the unique
        // index on dealers.user_id never sees a dangling reference.
        let linked_user = existing.user_id;
        let mut model: dealer::ActiveModel = existing.into();
        model.user_id = Set(None);
        let row = model.update(&txn).await?;
        if let Some(user_id) = linked_user {
            user::Entity::delete_by_id(user_id).exec(&txn).await?;
        }
        dealer::Entity::delete_by_id(row.id).exec(&txn).await?;

        txn.commit().await?;
        info!(dealer_id = id, "dealer deleted");
        Ok(())
    }
}

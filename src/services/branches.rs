use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{branch, dealer, product_supply, user},
    errors::ServiceError,
    pagination::{self, PageMeta, PageParams},
    scope::{created_rows_scope, Principal},
};

/// Service for managing branches.
#[derive(Clone)]
pub struct BranchService {
    db: Arc<DbPool>,
}

impl BranchService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists visible branches, name-ascending.
    #[instrument(skip(self, principal))]
    pub async fn list(
        &self,
        principal: &Principal,
        params: &PageParams,
        path: &str,
    ) -> Result<(Vec<branch::Model>, PageMeta), ServiceError> {
        let query = branch::Entity::find()
            .filter(created_rows_scope(principal, branch::Column::CreatedBy))
            .order_by_asc(branch::Column::Name);
        pagination::paginate(query, self.db.as_ref(), params, path).await
    }

    #[instrument(skip(self, principal))]
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<branch::Model, ServiceError> {
        branch::Entity::find_by_id(id)
            .filter(created_rows_scope(principal, branch::Column::CreatedBy))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Branch", id))
    }

    #[instrument(skip(self, principal))]
    pub async fn create(
        &self,
        principal: &Principal,
        name: String,
        address: Option<String>,
    ) -> Result<branch::Model, ServiceError> {
        let model = branch::ActiveModel {
            name: Set(name),
            address: Set(address),
            created_by: Set((principal.id > 0).then_some(principal.id)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(branch_id = model.id, "branch created");
        Ok(model)
    }

    /// Updates a visible branch.
    #[instrument(skip(self, principal, name, address))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        name: String,
        address: Option<String>,
    ) -> Result<branch::Model, ServiceError> {
        let existing = self.get(principal, id).await?;

        let mut model: branch::ActiveModel = existing.into();
        model.name = Set(name);
        model.address = Set(address);
        let model = model.update(self.db.as_ref()).await?;

        info!(branch_id = model.id, "branch updated");
        Ok(model)
    }

    /// Deletes a visible branch and everything under it in one transaction:
    /// the branch's dealers, their supplies and their provisioned login
    /// accounts. Staff accounts pinned to the branch lose the assignment but
    /// keep their login.
    #[instrument(skip(self, principal))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(principal, id).await?;

        let txn = self.db.begin().await?;

        let dealers = dealer::Entity::find()
            .filter(dealer::Column::BranchId.eq(existing.id))
            .all(&txn)
            .await?;
        for row in dealers {
            product_supply::Entity::delete_many()
                .filter(product_supply::Column::DealerId.eq(row.id))
                .exec(&txn)
                .await?;
            // Clear the back-link before removing the account so the unique
            // index on dealers.user_id never sees a dangling reference.
            let linked_user = row.user_id;
            let mut model: dealer::ActiveModel = row.into();
            model.user_id = Set(None);
            let row = model.update(&txn).await?;
            if let Some(user_id) = linked_user {
                user::Entity::delete_by_id(user_id).exec(&txn).await?;
            }
            dealer::Entity::delete_by_id(row.id).exec(&txn).await?;
        }

        user::Entity::update_many()
            .col_expr(user::Column::BranchId, Expr::value(None::<i64>))
            .filter(user::Column::BranchId.eq(existing.id))
            .exec(&txn)
            .await?;
        branch::Entity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;
        info!(branch_id = id, "branch deleted");
        Ok(())
    }
}

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{role, user},
    errors::ServiceError,
    pagination::{self, PageMeta, PageParams},
    scope::{created_rows_scope, Principal},
};

/// Service for managing roles.
#[derive(Clone)]
pub struct RoleService {
    db: Arc<DbPool>,
}

impl RoleService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists visible roles, name-ascending.
    #[instrument(skip(self, principal))]
    pub async fn list(
        &self,
        principal: &Principal,
        params: &PageParams,
        path: &str,
    ) -> Result<(Vec<role::Model>, PageMeta), ServiceError> {
        let query = role::Entity::find()
            .filter(created_rows_scope(principal, role::Column::CreatedBy))
            .order_by_asc(role::Column::Name);
        pagination::paginate(query, self.db.as_ref(), params, path).await
    }

    #[instrument(skip(self, principal))]
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<role::Model, ServiceError> {
        role::Entity::find_by_id(id)
            .filter(created_rows_scope(principal, role::Column::CreatedBy))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", id))
    }

    #[instrument(skip(self, principal))]
    pub async fn create(
        &self,
        principal: &Principal,
        name: String,
    ) -> Result<role::Model, ServiceError> {
        let exists = role::Entity::find()
            .filter(role::Column::Name.eq(name.clone()))
            .one(self.db.as_ref())
            .await?
            .is_some();
        if exists {
            return Err(ServiceError::Conflict(format!(
                "Role '{}' already exists",
                name
            )));
        }

        let model = role::ActiveModel {
            name: Set(name),
            created_by: Set((principal.id > 0).then_some(principal.id)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(role_id = model.id, "role created");
        Ok(model)
    }

    /// Renames a visible role. Role names stay globally unique.
    #[instrument(skip(self, principal))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        name: String,
    ) -> Result<role::Model, ServiceError> {
        let existing = self.get(principal, id).await?;

        let taken = role::Entity::find()
            .filter(role::Column::Name.eq(name.clone()))
            .filter(role::Column::Id.ne(existing.id))
            .one(self.db.as_ref())
            .await?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(format!(
                "Role '{}' already exists",
                name
            )));
        }

        let mut model: role::ActiveModel = existing.into();
        model.name = Set(name);
        let model = model.update(self.db.as_ref()).await?;

        info!(role_id = model.id, "role updated");
        Ok(model)
    }

    /// Deletes a visible role. Accounts assigned to it fall back to no role.
    #[instrument(skip(self, principal))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(principal, id).await?;

        let txn = self.db.begin().await?;
        user::Entity::update_many()
            .col_expr(user::Column::RoleId, Expr::value(None::<i64>))
            .filter(user::Column::RoleId.eq(existing.id))
            .exec(&txn)
            .await?;
        role::Entity::delete_by_id(existing.id).exec(&txn).await?;
        txn.commit().await?;

        info!(role_id = id, "role deleted");
        Ok(())
    }
}

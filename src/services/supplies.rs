use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{branch, dealer, product_supply},
    errors::ServiceError,
    pagination::{self, PageMeta, PageParams},
    scope::{supply_scope, Principal, PrincipalKind},
    services::ci_like,
};

/// Supply row enriched with dealer and branch context for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct SupplyView {
    pub id: i64,
    pub dealer_id: i64,
    pub dealer_name: String,
    pub branch_id: i64,
    pub branch_name: String,
    pub product_name: String,
    pub invoice_number: String,
    pub serial_number: String,
    pub purchase_date: Option<NaiveDate>,
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
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fields accepted on supply creation and update. `branch_id` is optional
/// cross-validation input: when present it must match the dealer's branch.
#[derive(Debug, Clone)]
pub struct SupplyInput {
    pub dealer_id: i64,
    pub branch_id: Option<i64>,
    pub product_name: String,
    pub invoice_number: String,
    pub serial_number: String,
    pub purchase_date: Option<NaiveDate>,
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

/// Caller-supplied list filters, applied on top of the access scope.
#[derive(Debug, Clone, Default)]
pub struct SupplyFilter {
    pub branch_id: Option<i64>,
    pub dealer_id: Option<i64>,
    pub search: Option<String>,
}

fn view_query() -> Select<product_supply::Entity> {
    use sea_orm::sea_query::Expr;

    product_supply::Entity::find()
        .join(JoinType::InnerJoin, product_supply::Relation::Dealer.def())
        .join(JoinType::InnerJoin, dealer::Relation::Branch.def())
        .column_as(Expr::col((dealer::Entity, dealer::Column::Name)), "dealer_name")
        .column_as(
            Expr::col((dealer::Entity, dealer::Column::BranchId)),
            "branch_id",
        )
        .column_as(Expr::col((branch::Entity, branch::Column::Name)), "branch_name")
}

fn search_condition(term: &str) -> Condition {
    Condition::any()
        .add(ci_like((dealer::Entity, dealer::Column::Name), term))
        .add(ci_like((dealer::Entity, dealer::Column::MobileNumber), term))
        .add(ci_like((dealer::Entity, dealer::Column::CompanyName), term))
        .add(ci_like(
            (product_supply::Entity, product_supply::Column::ProductName),
            term,
        ))
        .add(ci_like(
            (product_supply::Entity, product_supply::Column::SerialNumber),
            term,
        ))
        .add(ci_like(
            (product_supply::Entity, product_supply::Column::InvoiceNumber),
            term,
        ))
}

/// Service for managing product supplies.
#[derive(Clone)]
pub struct SupplyService {
    db: Arc<DbPool>,
}

impl SupplyService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists visible supplies, newest first.
    #[instrument(skip(self, principal))]
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &SupplyFilter,
        params: &PageParams,
        path: &str,
    ) -> Result<(Vec<SupplyView>, PageMeta), ServiceError> {
        let mut query = view_query()
            .filter(supply_scope(principal))
            .order_by_desc(product_supply::Column::CreatedAt)
            .order_by_desc(product_supply::Column::Id);

        if let Some(branch_id) = filter.branch_id {
            query = query.filter(dealer::Column::BranchId.eq(branch_id));
        }
        if let Some(dealer_id) = filter.dealer_id {
            query = query.filter(product_supply::Column::DealerId.eq(dealer_id));
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
            query = query.filter(search_condition(term));
        }

        pagination::paginate(query, self.db.as_ref(), params, path).await
    }

    /// Per-dealer purchase history, newest first.
    #[instrument(skip(self, principal))]
    pub async fn list_for_dealer(
        &self,
        principal: &Principal,
        dealer_id: i64,
        params: &PageParams,
        path: &str,
    ) -> Result<(Vec<SupplyView>, PageMeta), ServiceError> {
        dealer::Entity::find_by_id(dealer_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Dealer", dealer_id))?;

        let filter = SupplyFilter {
            dealer_id: Some(dealer_id),
            ..Default::default()
        };
        self.list(principal, &filter, params, path).await
    }

    #[instrument(skip(self, principal))]
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<SupplyView, ServiceError> {
        view_query()
            .filter(supply_scope(principal))
            .filter(product_supply::Column::Id.eq(id))
            .into_model::<SupplyView>()
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Product supply", id))
    }

    /// Creates one supply record.
    #[instrument(skip(self, principal, input))]
    pub async fn create(
        &self,
        principal: &Principal,
        input: SupplyInput,
    ) -> Result<SupplyView, ServiceError> {
        ensure_dealer_writable(principal, input.dealer_id)?;

        let txn = self.db.begin().await?;
        validate_dealer_branch(&txn, &input).await?;
        ensure_serial_available(&txn, &input.serial_number, None).await?;
        let row = insert_supply(&txn, principal, input).await?;
        txn.commit().await?;

        info!(supply_id = row.id, "product supply created");
        self.get(principal, row.id).await
    }

    /// Creates a batch of supply records as a single all-or-nothing
    /// transaction: if any item fails validation or uniqueness, nothing is
    /// persisted.
    #[instrument(skip(self, principal, items))]
    pub async fn create_batch(
        &self,
        principal: &Principal,
        items: Vec<SupplyInput>,
    ) -> Result<Vec<i64>, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::Validation(
                "At least one supply record is required".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let mut seen_serials: HashSet<String> = HashSet::new();
        let mut ids = Vec::with_capacity(items.len());

        for (index, input) in items.into_iter().enumerate() {
            if !seen_serials.insert(input.serial_number.clone()) {
                return Err(ServiceError::Validation(format!(
                    "Duplicate serial number '{}' within batch (item {})",
                    input.serial_number,
                    index + 1
                )));
            }
            ensure_dealer_writable(principal, input.dealer_id)?;
            validate_dealer_branch(&txn, &input).await?;
            ensure_serial_available(&txn, &input.serial_number, None).await?;
            let row = insert_supply(&txn, principal, input).await?;
            ids.push(row.id);
        }

        txn.commit().await?;
        info!(count = ids.len(), "supply batch created");
        Ok(ids)
    }

    /// Updates a visible supply record.
    #[instrument(skip(self, principal, input))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        input: SupplyInput,
    ) -> Result<SupplyView, ServiceError> {
        let existing = product_supply::Entity::find_by_id(id)
            .filter(supply_scope(principal))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Product supply", id))?;

        ensure_dealer_writable(principal, input.dealer_id)?;

        let txn = self.db.begin().await?;
        validate_dealer_branch(&txn, &input).await?;
        ensure_serial_available(&txn, &input.serial_number, Some(existing.id)).await?;

        let mut model: product_supply::ActiveModel = existing.into();
        model.dealer_id = Set(input.dealer_id);
        model.product_name = Set(input.product_name);
        model.invoice_number = Set(input.invoice_number);
        model.serial_number = Set(input.serial_number);
        model.purchase_date = Set(input.purchase_date);
        model.count = Set(input.count);
        model.chase_number = Set(input.chase_number);
        model.vehicle_model = Set(input.vehicle_model);
        model.vehicle_variant = Set(input.vehicle_variant);
        model.vehicle_warranty = Set(input.vehicle_warranty);
        model.controller = Set(input.controller);
        model.motor = Set(input.motor);
        model.battery_number = Set(input.battery_number);
        model.battery_model = Set(input.battery_model);
        model.battery_variant = Set(input.battery_variant);
        model.battery_warranty = Set(input.battery_warranty);
        model.bulging_warranty = Set(input.bulging_warranty);
        model.charger_number = Set(input.charger_number);
        model.charger_model = Set(input.charger_model);
        model.charger_type = Set(input.charger_type);
        model.charger_variant = Set(input.charger_variant);
        model.charger_warranty = Set(input.charger_warranty);
        model.remarks = Set(input.remarks);
        let row = model.update(&txn).await?;
        txn.commit().await?;

        self.get(principal, row.id).await
    }

    /// Deletes a visible supply record.
    #[instrument(skip(self, principal))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let existing = product_supply::Entity::find_by_id(id)
            .filter(supply_scope(principal))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Product supply", id))?;

        product_supply::Entity::delete_by_id(existing.id)
            .exec(self.db.as_ref())
            .await?;
        info!(supply_id = id, "product supply deleted");
        Ok(())
    }
}

/// Dealer-class principals may only write into their own linked profile.
/// Any other target is answered the same way a missing dealer would be, so
/// the write path never reveals foreign dealer ids.
fn ensure_dealer_writable(principal: &Principal, dealer_id: i64) -> Result<(), ServiceError> {
    match principal.kind {
        PrincipalKind::DealerUser { dealer_id: linked } if linked != Some(dealer_id) => {
            Err(ServiceError::not_found("Dealer", dealer_id))
        }
        _ => Ok(()),
    }
}

/// Cross-entity invariant: the referenced dealer must exist, and when the
/// caller also names a branch it must be the dealer's actual branch.
async fn validate_dealer_branch<C: ConnectionTrait>(
    conn: &C,
    input: &SupplyInput,
) -> Result<dealer::Model, ServiceError> {
    let dealer_row = dealer::Entity::find_by_id(input.dealer_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dealer", input.dealer_id))?;

    if let Some(requested_branch) = input.branch_id {
        if dealer_row.branch_id != requested_branch {
            let actual = branch::Entity::find_by_id(dealer_row.branch_id)
                .one(conn)
                .await?
                .map(|b| b.name)
                .unwrap_or_default();
            return Err(ServiceError::Validation(format!(
                "Dealer '{}' belongs to branch '{}' (id {}), not branch id {}",
                dealer_row.name, actual, dealer_row.branch_id, requested_branch
            )));
        }
    }
    Ok(dealer_row)
}

/// Serial numbers are globally unique across all supplies.
async fn ensure_serial_available<C: ConnectionTrait>(
    conn: &C,
    serial_number: &str,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = product_supply::Entity::find()
        .filter(product_supply::Column::SerialNumber.eq(serial_number));
    if let Some(id) = exclude_id {
        query = query.filter(product_supply::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "A product supply with serial number '{}' already exists",
            serial_number
        )));
    }
    Ok(())
}

async fn insert_supply<C: ConnectionTrait>(
    conn: &C,
    principal: &Principal,
    input: SupplyInput,
) -> Result<product_supply::Model, ServiceError> {
    if input.count < 1 {
        return Err(ServiceError::Validation(
            "count must be a positive integer".to_string(),
        ));
    }

    let row = product_supply::ActiveModel {
        dealer_id: Set(input.dealer_id),
        product_name: Set(input.product_name),
        invoice_number: Set(input.invoice_number),
        serial_number: Set(input.serial_number),
        purchase_date: Set(input.purchase_date),
        count: Set(input.count),
        chase_number: Set(input.chase_number),
        vehicle_model: Set(input.vehicle_model),
        vehicle_variant: Set(input.vehicle_variant),
        vehicle_warranty: Set(input.vehicle_warranty),
        controller: Set(input.controller),
        motor: Set(input.motor),
        battery_number: Set(input.battery_number),
        battery_model: Set(input.battery_model),
        battery_variant: Set(input.battery_variant),
        battery_warranty: Set(input.battery_warranty),
        bulging_warranty: Set(input.bulging_warranty),
        charger_number: Set(input.charger_number),
        charger_model: Set(input.charger_model),
        charger_type: Set(input.charger_type),
        charger_variant: Set(input.charger_variant),
        charger_warranty: Set(input.charger_warranty),
        remarks: Set(input.remarks),
        created_by: Set((principal.id > 0).then_some(principal.id)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(row)
}

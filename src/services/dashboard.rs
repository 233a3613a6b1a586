//! Inventory category aggregation for the dashboard and dealer detail views.
//!
//! Supply rows are bucketed by product name into three fixed categories.
//! Matching is case-insensitive substring matching on the trimmed name, with
//! "vehicle" taking priority over "battery" and "battery" over "charger";
//! names matching none are dropped from the totals.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{branch, dealer, product_supply},
    errors::ServiceError,
    scope::{dealer_scope, supply_scope, Principal, PrincipalKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Vehicle,
    Battery,
    Charger,
}

/// Buckets a product name, or `None` when it matches no category.
pub fn classify(product_name: &str) -> Option<Category> {
    let name = product_name.trim().to_lowercase();
    if name.contains("vehicle") {
        Some(Category::Vehicle)
    } else if name.contains("battery") {
        Some(Category::Battery)
    } else if name.contains("charger") {
        Some(Category::Charger)
    } else {
        None
    }
}

/// Unit totals per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCounts {
    pub vehicle_count: i64,
    pub battery_count: i64,
    pub charger_count: i64,
}

/// The dashboard payload: category totals plus visible dealer and branch
/// counts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub vehicle_count: i64,
    pub battery_count: i64,
    pub charger_count: i64,
    pub dealer_count: u64,
    pub branch_count: u64,
}

#[derive(FromQueryResult)]
struct ProductGroup {
    product_name: String,
    total: Option<i64>,
}

/// Sums supply `count` per category over the rows matching `predicate`.
pub async fn category_counts<C: ConnectionTrait>(
    conn: &C,
    predicate: Condition,
) -> Result<CategoryCounts, ServiceError> {
    let groups = product_supply::Entity::find()
        .select_only()
        .column(product_supply::Column::ProductName)
        .column_as(product_supply::Column::Count.sum(), "total")
        .filter(predicate)
        .group_by(product_supply::Column::ProductName)
        .into_model::<ProductGroup>()
        .all(conn)
        .await?;

    let mut counts = CategoryCounts::default();
    for group in groups {
        let total = group.total.unwrap_or(0);
        match classify(&group.product_name) {
            Some(Category::Vehicle) => counts.vehicle_count += total,
            Some(Category::Battery) => counts.battery_count += total,
            Some(Category::Charger) => counts.charger_count += total,
            None => {}
        }
    }
    Ok(counts)
}

/// Service producing the dashboard summary.
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, principal))]
    pub async fn summary(&self, principal: &Principal) -> Result<DashboardSummary, ServiceError> {
        let counts = category_counts(self.db.as_ref(), supply_scope(principal)).await?;

        // Dealer-class principals do not own branches or dealer rows; they
        // count their own linked profile and its branch, or nothing at all.
        let (dealer_count, branch_count) = match principal.kind {
            PrincipalKind::DealerUser { dealer_id } => {
                if dealer_id.is_some() {
                    (1, 1)
                } else {
                    (0, 0)
                }
            }
            _ => {
                let dealers = dealer::Entity::find()
                    .filter(dealer_scope(principal))
                    .count(self.db.as_ref())
                    .await?;
                let branches = branch::Entity::find()
                    .filter(crate::scope::created_rows_scope(
                        principal,
                        branch::Column::CreatedBy,
                    ))
                    .count(self.db.as_ref())
                    .await?;
                (dealers, branches)
            }
        };

        Ok(DashboardSummary {
            vehicle_count: counts.vehicle_count,
            battery_count: counts.battery_count,
            charger_count: counts.charger_count,
            dealer_count,
            branch_count,
        })
    }

    /// Category totals restricted to one dealer's supplies, for the dealer
    /// detail view.
    #[instrument(skip(self, principal))]
    pub async fn counts_for_dealer(
        &self,
        principal: &Principal,
        dealer_id: i64,
    ) -> Result<CategoryCounts, ServiceError> {
        let predicate = supply_scope(principal).add(product_supply::Column::DealerId.eq(dealer_id));
        category_counts(self.db.as_ref(), predicate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive_and_trims() {
        assert_eq!(classify("  Electric Vehicle "), Some(Category::Vehicle));
        assert_eq!(classify("BATTERY pack"), Some(Category::Battery));
        assert_eq!(classify("fast charger"), Some(Category::Charger));
    }

    #[test]
    fn classify_priority_vehicle_over_battery_over_charger() {
        assert_eq!(classify("vehicle battery"), Some(Category::Vehicle));
        assert_eq!(classify("battery charger"), Some(Category::Battery));
    }

    #[test]
    fn classify_unmatched_names_drop_out() {
        assert_eq!(classify("spare tyre"), None);
        assert_eq!(classify(""), None);
    }
}

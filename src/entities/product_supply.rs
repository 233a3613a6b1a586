use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// One supplied product line. `serial_number` is globally unique across all
/// dealers. The vehicle/battery/charger columns are free-form descriptive
/// attributes carried over from invoice paperwork.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_supplies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dealer_id: i64,
    pub product_name: String,
    pub invoice_number: String,
    #[sea_orm(unique)]
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
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dealer::Entity",
        from = "Column::DealerId",
        to = "super::dealer::Column::Id",
        on_delete = "Cascade"
    )]
    Dealer,
}

impl Related<super::dealer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dealer.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;

        let now = Utc::now();
        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(Some(now));

        Ok(active_model)
    }
}
